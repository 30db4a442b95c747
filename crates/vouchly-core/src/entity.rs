// ── Entity adapters ──
//
// Presentation-layer objects binding one data field each to a
// user-facing control. Three variants share a minimal capability
// surface: every adapter can read, numbers can also write, buttons can
// trigger an action. Each holds a `Coordinator` clone (composition --
// no base-class inheritance, no global registry).

use chrono::{DateTime, Utc};

use crate::coordinator::{Coordinator, CoordinatorAction};
use crate::error::CoreError;
use crate::options::{OptionBounds, OptionKey};

/// Display category of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCategory {
    Sensor,
    Number,
    Button,
}

/// Shared capability of all adapters: identity and category.
pub trait Entity {
    /// Stable field key, usable as an entity id suffix.
    fn key(&self) -> &'static str;

    fn category(&self) -> EntityCategory;

    /// Whether the backing data is current. Mirrors the latest
    /// snapshot's `available` flag.
    fn available(&self) -> bool;
}

// ── Sensor (read-only display) ───────────────────────────────────────

/// Snapshot field a sensor renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorField {
    /// Code of the newest redeemable voucher.
    LatestVoucher,
    /// Total vouchers on the controller.
    VoucherCount,
    /// Timestamp of the most recent refresh attempt.
    LastPull,
}

/// Value produced by a sensor read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorValue {
    Text(String),
    Count(usize),
    Timestamp(DateTime<Utc>),
}

/// Read-only adapter: value comes straight from the latest snapshot and
/// is re-evaluated whenever a new one is published.
pub struct SensorEntity {
    coordinator: Coordinator,
    field: SensorField,
}

impl SensorEntity {
    pub fn new(coordinator: Coordinator, field: SensorField) -> Self {
        Self { coordinator, field }
    }

    /// One sensor per snapshot field.
    pub fn all(coordinator: &Coordinator) -> Vec<Self> {
        [
            SensorField::LatestVoucher,
            SensorField::VoucherCount,
            SensorField::LastPull,
        ]
        .into_iter()
        .map(|field| Self::new(coordinator.clone(), field))
        .collect()
    }

    /// Current value from the latest snapshot. `None` when the field has
    /// nothing to show (no redeemable voucher, no pull yet). The value
    /// may be stale when [`available()`](Entity::available) is false.
    pub fn value(&self) -> Option<SensorValue> {
        let snapshot = self.coordinator.snapshot();
        match self.field {
            SensorField::LatestVoucher => snapshot
                .latest_voucher()
                .map(|v| SensorValue::Text(v.code.clone())),
            SensorField::VoucherCount => Some(SensorValue::Count(snapshot.len())),
            SensorField::LastPull => snapshot.last_pull.map(SensorValue::Timestamp),
        }
    }
}

impl Entity for SensorEntity {
    fn key(&self) -> &'static str {
        match self.field {
            SensorField::LatestVoucher => "voucher",
            SensorField::VoucherCount => "voucher_count",
            SensorField::LastPull => "last_pull",
        }
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Sensor
    }

    fn available(&self) -> bool {
        self.coordinator.snapshot().available
    }
}

// ── Number (read-write option) ───────────────────────────────────────

/// Read-write adapter over one voucher option. Reads go through
/// `Coordinator::option`, writes through `Coordinator::set_option`;
/// out-of-range writes are rejected per the option's declared bounds.
pub struct NumberEntity {
    coordinator: Coordinator,
    key: OptionKey,
}

impl NumberEntity {
    pub fn new(coordinator: Coordinator, key: OptionKey) -> Self {
        Self { coordinator, key }
    }

    /// The mutable voucher fields exposed as numbers: quota, duration,
    /// and usage quota. Batch size stays internal to the create action.
    pub fn all(coordinator: &Coordinator) -> Vec<Self> {
        [
            OptionKey::VoucherQuota,
            OptionKey::VoucherDuration,
            OptionKey::VoucherUsageQuota,
        ]
        .into_iter()
        .map(|key| Self::new(coordinator.clone(), key))
        .collect()
    }

    pub fn option_key(&self) -> OptionKey {
        self.key
    }

    /// Declared bounds (min, max, step) and unit for this field.
    pub fn bounds(&self) -> OptionBounds {
        self.key.bounds()
    }

    pub fn value(&self) -> u64 {
        self.coordinator.option(self.key)
    }

    pub fn set_value(&self, value: u64) -> Result<(), CoreError> {
        self.coordinator.set_option(self.key, value)
    }
}

impl Entity for NumberEntity {
    fn key(&self) -> &'static str {
        match self.key {
            OptionKey::VoucherNumber => "voucher_number",
            OptionKey::VoucherQuota => "voucher_quota",
            OptionKey::VoucherDuration => "voucher_duration",
            OptionKey::VoucherUsageQuota => "voucher_usage_quota",
        }
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Number
    }

    fn available(&self) -> bool {
        // Options live outside the snapshot; a number is writable even
        // while the controller is unreachable.
        true
    }
}

// ── Button (action trigger) ──────────────────────────────────────────

/// Action-trigger adapter: fire-and-forget from the caller's point of
/// view, but the dispatch result is returned so failures are reportable.
pub struct ButtonEntity {
    coordinator: Coordinator,
    action: CoordinatorAction,
}

impl ButtonEntity {
    pub fn new(coordinator: Coordinator, action: CoordinatorAction) -> Self {
        Self { coordinator, action }
    }

    /// The registered buttons: currently just voucher creation.
    pub fn all(coordinator: &Coordinator) -> Vec<Self> {
        vec![Self::new(
            coordinator.clone(),
            CoordinatorAction::CreateVouchers,
        )]
    }

    pub fn action(&self) -> &CoordinatorAction {
        &self.action
    }

    /// Trigger the bound action through the coordinator.
    pub async fn press(&self) -> Result<(), CoreError> {
        self.coordinator.press(self.action.clone()).await
    }
}

impl Entity for ButtonEntity {
    fn key(&self) -> &'static str {
        match self.action {
            CoordinatorAction::CreateVouchers => "voucher_create",
            CoordinatorAction::DeleteVoucher { .. } => "voucher_delete",
        }
    }

    fn category(&self) -> EntityCategory {
        EntityCategory::Button
    }

    fn available(&self) -> bool {
        !self.coordinator.is_closed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;

    fn coordinator() -> Coordinator {
        Coordinator::new(ConnectionConfig {
            host: "10.0.0.1".into(),
            ..ConnectionConfig::default()
        })
    }

    #[test]
    fn sensor_values_from_empty_snapshot() {
        let c = coordinator();
        let sensors = SensorEntity::all(&c);

        assert_eq!(sensors.len(), 3);
        // No pull yet: latest voucher and last-pull have nothing to show,
        // the count renders as zero.
        assert_eq!(sensors[0].value(), None);
        assert_eq!(sensors[1].value(), Some(SensorValue::Count(0)));
        assert_eq!(sensors[2].value(), None);
        assert!(!sensors[0].available());
    }

    #[tokio::test]
    async fn sensor_last_pull_appears_after_refresh() {
        let c = coordinator();
        let sensor = SensorEntity::new(c.clone(), SensorField::LastPull);

        c.refresh().await;
        assert!(matches!(sensor.value(), Some(SensorValue::Timestamp(_))));
    }

    #[test]
    fn number_round_trip_and_bounds_rejection() {
        let c = coordinator();
        let quota = NumberEntity::new(c, OptionKey::VoucherQuota);

        assert_eq!(quota.value(), 1);
        quota.set_value(5).unwrap();
        assert_eq!(quota.value(), 5);

        let err = quota.set_value(10_001).unwrap_err();
        assert!(matches!(err, CoreError::OptionOutOfRange { .. }));
        assert_eq!(quota.value(), 5);
    }

    #[test]
    fn number_descriptors_expose_bounds_and_units() {
        let c = coordinator();
        let numbers = NumberEntity::all(&c);

        assert_eq!(numbers.len(), 3);
        let duration = numbers
            .iter()
            .find(|n| n.option_key() == OptionKey::VoucherDuration)
            .unwrap();
        assert_eq!(duration.bounds().unit, Some("min"));
        assert_eq!(duration.bounds().min, 1);
        assert_eq!(Entity::key(duration), "voucher_duration");
    }

    #[tokio::test]
    async fn button_press_on_closed_coordinator_reports_failure() {
        let c = coordinator();
        c.close().await;

        let button = ButtonEntity::all(&c).remove(0);
        assert!(!button.available());
        assert!(matches!(
            button.press().await,
            Err(CoreError::CoordinatorClosed)
        ));
    }

    #[test]
    fn categories_and_keys() {
        let c = coordinator();
        let sensor = SensorEntity::new(c.clone(), SensorField::LatestVoucher);
        let button = ButtonEntity::new(c, CoordinatorAction::CreateVouchers);

        assert_eq!(sensor.category(), EntityCategory::Sensor);
        assert_eq!(sensor.key(), "voucher");
        assert_eq!(button.category(), EntityCategory::Button);
        assert_eq!(button.key(), "voucher_create");
    }
}
