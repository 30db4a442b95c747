//! Continuous snapshot streaming until Ctrl-C.

use std::io::{self, Write};
use std::sync::Arc;

use vouchly_core::{Coordinator, Snapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let mut rx = coordinator.subscribe();

    // The connect-time refresh already published; show it immediately.
    print_line(&coordinator.snapshot(), global.quiet)?;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::debug!("interrupt received, stopping watch");
                return Ok(());
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snap = rx.borrow_and_update().clone();
                print_line(&snap, global.quiet)?;
            }
        }
    }
}

fn print_line(snap: &Arc<Snapshot>, quiet: bool) -> Result<(), CliError> {
    if quiet {
        return Ok(());
    }

    let pulled = snap
        .last_pull
        .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
    let state = if snap.available { "ok" } else { "unavailable" };
    let latest = snap
        .latest_voucher()
        .map_or_else(|| "-".into(), |v| v.code.clone());

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{pulled}  {state:<12} {:>4} vouchers  latest {latest}",
        snap.len()
    )?;
    Ok(())
}
