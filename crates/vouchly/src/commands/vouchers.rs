//! Voucher command handlers: list, create, delete.

use std::sync::Arc;

use tabled::Tabled;

use vouchly_core::{Coordinator, CoordinatorAction, OptionKey, Voucher, VoucherStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::confirm;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VoucherRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Uses")]
    uses: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "Data (MB)")]
    data: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl From<&Arc<Voucher>> for VoucherRow {
    fn from(v: &Arc<Voucher>) -> Self {
        let quota = if v.quota == 0 {
            "multi".into()
        } else {
            v.quota.to_string()
        };
        Self {
            id: v.id.clone(),
            code: v.code.clone(),
            status: status_label(v.status).into(),
            uses: format!("{}/{quota}", v.used),
            minutes: v.duration_minutes,
            data: v
                .usage_quota_mb
                .map_or_else(|| "-".into(), |mb| mb.to_string()),
            created: v
                .created_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            note: v.note.clone().unwrap_or_default(),
        }
    }
}

fn status_label(status: VoucherStatus) -> &'static str {
    match status {
        VoucherStatus::Valid => "valid",
        VoucherStatus::Used => "used",
        VoucherStatus::Expired => "expired",
        VoucherStatus::Unknown => "unknown",
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(coordinator: &Coordinator, all: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = coordinator.snapshot();
    let vouchers: Vec<Arc<Voucher>> = snap
        .vouchers
        .iter()
        .filter(|v| all || v.is_redeemable())
        .cloned()
        .collect();

    let out = output::render_list(
        &global.output,
        &vouchers,
        |v| VoucherRow::from(v),
        |v| v.code.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn create(
    coordinator: &Coordinator,
    number: Option<u64>,
    quota: Option<u64>,
    duration: Option<u64>,
    usage_quota: Option<u64>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let overrides = [
        (OptionKey::VoucherNumber, number),
        (OptionKey::VoucherQuota, quota),
        (OptionKey::VoucherDuration, duration),
        (OptionKey::VoucherUsageQuota, usage_quota),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            coordinator.set_option(key, value)?;
        }
    }

    coordinator.press(CoordinatorAction::CreateVouchers).await?;
    if !global.quiet {
        let count = coordinator.option(OptionKey::VoucherNumber);
        eprintln!("{count} voucher(s) created");
    }
    Ok(())
}

pub async fn delete(
    coordinator: &Coordinator,
    id: String,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Resolve against the snapshot first so typos fail fast.
    let snap = coordinator.snapshot();
    if !snap.vouchers.iter().any(|v| v.id == id) {
        return Err(CliError::NotFound { identifier: id });
    }

    if !confirm(&format!("Delete voucher {id}?"), global.yes)? {
        return Ok(());
    }

    coordinator
        .press(CoordinatorAction::DeleteVoucher { id })
        .await?;
    if !global.quiet {
        eprintln!("Voucher deleted");
    }
    Ok(())
}
