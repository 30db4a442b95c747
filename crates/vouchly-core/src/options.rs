// ── Per-field voucher options ──
//
// The mutable configuration values that parameterize voucher creation:
// batch size, per-voucher quota, validity duration, and data cap. Each
// key declares bounds and a default; writes outside the bounds are
// rejected (never clamped), so a successful set/get round-trips exactly.
//
// Option values live independently of the snapshot: a failed refresh
// cycle never touches them.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::CoreError;

/// The fixed set of mutable voucher configuration fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OptionKey {
    /// Vouchers created per batch.
    VoucherNumber,
    /// Uses per voucher. 0 = unlimited (multi-use).
    VoucherQuota,
    /// Validity in minutes, counted from first use.
    VoucherDuration,
    /// Data cap in megabytes. 0 = no cap.
    VoucherUsageQuota,
}

/// Declared bounds for one option field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionBounds {
    pub default: u64,
    pub min: u64,
    pub max: u64,
    pub step: u64,
    /// Unit label for display surfaces. `None` for dimensionless counts.
    pub unit: Option<&'static str>,
}

impl OptionKey {
    /// Bounds and default for this field.
    pub fn bounds(self) -> OptionBounds {
        match self {
            Self::VoucherNumber => OptionBounds {
                default: 1,
                min: 1,
                max: 10_000,
                step: 1,
                unit: None,
            },
            Self::VoucherQuota => OptionBounds {
                default: 1,
                min: 0,
                max: 10_000,
                step: 1,
                unit: Some("uses"),
            },
            Self::VoucherDuration => OptionBounds {
                default: 480,
                min: 1,
                max: 1_000_000,
                step: 1,
                unit: Some("min"),
            },
            Self::VoucherUsageQuota => OptionBounds {
                default: 0,
                min: 0,
                max: 1_048_576,
                step: 1,
                unit: Some("MB"),
            },
        }
    }
}

/// Concurrent store for the option values.
///
/// Reads fall back to the declared default until a value is set.
#[derive(Debug, Default)]
pub struct OptionStore {
    values: DashMap<OptionKey, u64>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for `key` (the declared default until set).
    pub fn get(&self, key: OptionKey) -> u64 {
        self.values
            .get(&key)
            .map_or_else(|| key.bounds().default, |v| *v)
    }

    /// Set `key` to `value`, enforcing the declared bounds.
    ///
    /// Out-of-range values are rejected with
    /// [`CoreError::OptionOutOfRange`]; the stored value is unchanged.
    pub fn set(&self, key: OptionKey, value: u64) -> Result<(), CoreError> {
        let bounds = key.bounds();
        if value < bounds.min || value > bounds.max {
            return Err(CoreError::OptionOutOfRange {
                key,
                value,
                min: bounds.min,
                max: bounds.max,
            });
        }
        self.values.insert(key, value);
        Ok(())
    }

    /// Snapshot of all current values, in declaration order.
    pub fn all(&self) -> Vec<(OptionKey, u64)> {
        OptionKey::iter().map(|k| (k, self.get(k))).collect()
    }
}
