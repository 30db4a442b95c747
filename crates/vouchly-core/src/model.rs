// ── Voucher domain model ──
//
// Canonical voucher type, converted from the wire-shaped
// `vouchly_api::VoucherRecord`. Epoch timestamps become `DateTime<Utc>`,
// the controller's status string becomes an enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vouchly_api::VoucherRecord;

/// Redemption state of a voucher, derived from the controller's
/// status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoucherStatus {
    /// Unredeemed, or a multi-use voucher with uses remaining.
    Valid,
    /// A multi-use voucher that has been redeemed at least once.
    Used,
    /// Past its expiry.
    Expired,
    /// Status string the controller added after this was written.
    Unknown,
}

impl VoucherStatus {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("VALID_ONE" | "VALID_MULTI") => Self::Valid,
            Some("USED_MULTIPLE") => Self::Used,
            Some("EXPIRED") => Self::Expired,
            Some(_) => Self::Unknown,
            // Older controllers omit the field for unredeemed vouchers.
            None => Self::Valid,
        }
    }
}

/// Voucher for guest hotspot access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    pub id: String,
    pub code: String,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Uses allowed. 0 = unlimited (multi-use).
    pub quota: u32,
    /// Times redeemed so far.
    pub used: u32,
    /// Validity in minutes from first use.
    pub duration_minutes: u32,
    /// Data cap in megabytes, if set.
    pub usage_quota_mb: Option<u64>,
    pub rx_rate_limit_kbps: Option<u64>,
    pub tx_rate_limit_kbps: Option<u64>,
    pub status: VoucherStatus,
    /// Expiry of an activated voucher.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Voucher {
    /// Whether the voucher can still be redeemed.
    pub fn is_redeemable(&self) -> bool {
        self.status == VoucherStatus::Valid
    }
}

impl From<VoucherRecord> for Voucher {
    fn from(raw: VoucherRecord) -> Self {
        Self {
            id: raw.id,
            code: raw.code,
            note: raw.note,
            created_at: DateTime::<Utc>::from_timestamp(raw.create_time, 0),
            quota: raw.quota,
            used: raw.used,
            duration_minutes: raw.duration,
            usage_quota_mb: raw.qos_usage_quota,
            rx_rate_limit_kbps: raw.qos_rate_max_up,
            tx_rate_limit_kbps: raw.qos_rate_max_down,
            status: VoucherStatus::parse(raw.status.as_deref()),
            expires_at: raw
                .status_expires
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(status: Option<&str>) -> VoucherRecord {
        VoucherRecord {
            id: "6643a3e8f1e6c70588b4a1d2".into(),
            code: "47283-9174".into(),
            create_time: 1_715_700_000,
            quota: 1,
            used: 0,
            duration: 480,
            qos_usage_quota: Some(1024),
            qos_rate_max_up: None,
            qos_rate_max_down: None,
            note: Some("front desk".into()),
            status: status.map(String::from),
            status_expires: None,
            admin_name: None,
        }
    }

    #[test]
    fn converts_wire_record() {
        let voucher = Voucher::from(raw(Some("VALID_ONE")));
        assert_eq!(voucher.code, "47283-9174");
        assert_eq!(voucher.duration_minutes, 480);
        assert_eq!(voucher.usage_quota_mb, Some(1024));
        assert_eq!(
            voucher.created_at.unwrap().timestamp(),
            1_715_700_000
        );
        assert!(voucher.is_redeemable());
    }

    #[test]
    fn status_parsing() {
        assert_eq!(
            Voucher::from(raw(Some("VALID_MULTI"))).status,
            VoucherStatus::Valid
        );
        assert_eq!(
            Voucher::from(raw(Some("USED_MULTIPLE"))).status,
            VoucherStatus::Used
        );
        assert_eq!(
            Voucher::from(raw(Some("EXPIRED"))).status,
            VoucherStatus::Expired
        );
        assert_eq!(
            Voucher::from(raw(Some("SOMETHING_NEW"))).status,
            VoucherStatus::Unknown
        );
        assert_eq!(Voucher::from(raw(None)).status, VoucherStatus::Valid);
    }
}
