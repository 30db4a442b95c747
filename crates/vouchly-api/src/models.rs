// Wire types for the legacy voucher endpoints.
//
// Field names mirror the controller's JSON exactly; no domain semantics
// here. `vouchly-core` converts these into its own `Voucher` type.

use serde::{Deserialize, Serialize};

/// The `meta` object present on every legacy API response.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyMeta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

/// The `{ meta, data }` envelope wrapping every legacy response.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: LegacyMeta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A hotspot voucher as returned by `GET .../stat/voucher`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub code: String,
    /// Creation time, epoch seconds.
    pub create_time: i64,
    /// Number of uses allowed. 0 = unlimited (multi-use voucher).
    #[serde(default)]
    pub quota: u32,
    /// Number of times the voucher has been redeemed.
    #[serde(default)]
    pub used: u32,
    /// Validity duration in minutes, counted from first use.
    #[serde(default)]
    pub duration: u32,
    /// Data cap in megabytes, if set.
    #[serde(default)]
    pub qos_usage_quota: Option<u64>,
    /// Upload rate cap in kbps, if set.
    #[serde(default)]
    pub qos_rate_max_up: Option<u64>,
    /// Download rate cap in kbps, if set.
    #[serde(default)]
    pub qos_rate_max_down: Option<u64>,
    #[serde(default)]
    pub note: Option<String>,
    /// Controller status string: `VALID_ONE`, `VALID_MULTI`, `USED_MULTIPLE`, `EXPIRED`.
    #[serde(default)]
    pub status: Option<String>,
    /// Expiry time of an activated voucher, epoch seconds.
    #[serde(default)]
    pub status_expires: Option<i64>,
    #[serde(default)]
    pub admin_name: Option<String>,
}

/// Parameters for `cmd/hotspot` `create-voucher`.
///
/// Serialized with the legacy API's terse field names (`n`, `expire`, ...).
/// The `cmd` discriminator is added by the client, not carried here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVoucherRequest {
    /// Number of vouchers to create.
    #[serde(rename = "n")]
    pub count: u32,
    /// Uses per voucher. 0 = unlimited.
    pub quota: u32,
    /// Validity in minutes from first use.
    #[serde(rename = "expire")]
    pub duration_minutes: u32,
    /// Data cap in megabytes.
    #[serde(rename = "bytes", skip_serializing_if = "Option::is_none")]
    pub usage_quota_mb: Option<u64>,
    /// Upload rate cap in kbps.
    #[serde(rename = "up", skip_serializing_if = "Option::is_none")]
    pub rx_rate_limit_kbps: Option<u64>,
    /// Download rate cap in kbps.
    #[serde(rename = "down", skip_serializing_if = "Option::is_none")]
    pub tx_rate_limit_kbps: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Response record from `create-voucher`: the controller returns the
/// creation timestamp of the batch, which keys the new vouchers in a
/// subsequent `stat/voucher` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoucherResult {
    pub create_time: i64,
}
