// ── Refresh snapshot ──
//
// The immutable result of one refresh cycle. Exactly one snapshot is
// current at any time; the coordinator replaces it wholesale through a
// watch channel, so observers never see a partially-updated state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::Voucher;

/// Result of the most recent refresh cycle.
///
/// Always total: `available` and `last_pull` are present whatever the
/// remote outcome. On a failed refresh `vouchers` carries the previous
/// (stale) list with `available == false`.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Start time of the most recent refresh attempt. `None` only before
    /// the first attempt.
    pub last_pull: Option<DateTime<Utc>>,
    /// Whether the last refresh succeeded.
    pub available: bool,
    /// Vouchers from the last successful pull.
    pub vouchers: Vec<Arc<Voucher>>,
}

impl Snapshot {
    /// Number of vouchers in the snapshot.
    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }

    /// The most recently created voucher that can still be redeemed.
    ///
    /// This is what a display surface shows as "the" voucher to hand out.
    pub fn latest_voucher(&self) -> Option<&Arc<Voucher>> {
        self.vouchers
            .iter()
            .filter(|v| v.is_redeemable())
            .max_by_key(|v| v.created_at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::VoucherStatus;

    fn voucher(id: &str, created_secs: i64, status: VoucherStatus) -> Arc<Voucher> {
        Arc::new(Voucher {
            id: id.into(),
            code: format!("code-{id}"),
            note: None,
            created_at: DateTime::<Utc>::from_timestamp(created_secs, 0),
            quota: 1,
            used: 0,
            duration_minutes: 480,
            usage_quota_mb: None,
            rx_rate_limit_kbps: None,
            tx_rate_limit_kbps: None,
            status,
            expires_at: None,
        })
    }

    #[test]
    fn latest_voucher_prefers_newest_redeemable() {
        let snap = Snapshot {
            last_pull: Some(Utc::now()),
            available: true,
            vouchers: vec![
                voucher("a", 100, VoucherStatus::Valid),
                voucher("b", 300, VoucherStatus::Expired),
                voucher("c", 200, VoucherStatus::Valid),
            ],
        };
        assert_eq!(snap.latest_voucher().unwrap().id, "c");
    }

    #[test]
    fn latest_voucher_none_when_all_spent() {
        let snap = Snapshot {
            last_pull: Some(Utc::now()),
            available: true,
            vouchers: vec![voucher("a", 100, VoucherStatus::Expired)],
        };
        assert!(snap.latest_voucher().is_none());
    }

    #[test]
    fn default_snapshot_is_total() {
        let snap = Snapshot::default();
        assert!(snap.last_pull.is_none());
        assert!(!snap.available);
        assert!(snap.is_empty());
    }
}
