//! Poll-and-expose layer between `vouchly-api` and UI consumers.
//!
//! This crate owns the business logic for managing UniFi guest-hotspot
//! vouchers:
//!
//! - **[`Coordinator`]** -- Central facade managing the full lifecycle:
//!   [`connect()`](Coordinator::connect) detects the platform,
//!   authenticates, performs an initial pull, then spawns a background
//!   task for periodic refresh. Every refresh publishes one immutable
//!   [`Snapshot`] to subscribers and never fails the cycle itself --
//!   remote errors degrade the snapshot's `available` flag instead.
//!
//! - **[`Snapshot`]** -- The immutable result of the most recent refresh:
//!   pull timestamp, availability, and the voucher list. Replaced
//!   wholesale through a `tokio::sync::watch` channel; observers never
//!   see a partially-updated snapshot.
//!
//! - **Options** ([`OptionKey`], [`OptionStore`]) -- Per-field voucher
//!   configuration (batch size, quota, duration, data cap) with declared
//!   bounds. Independent of the live snapshot; out-of-range writes are
//!   rejected.
//!
//! - **Entity adapters** ([`entity`]) -- Sensor, number, and button
//!   adapters binding one data field each to a user-facing control.
//!   Adapters hold a `Coordinator` clone (composition, no inheritance)
//!   and delegate reads to the latest snapshot, writes to the option
//!   store, and actions to [`Coordinator::press`].

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod model;
pub mod options;
pub mod snapshot;

pub use config::ConnectionConfig;
pub use coordinator::{Coordinator, CoordinatorAction};
pub use entity::{
    ButtonEntity, Entity, EntityCategory, NumberEntity, SensorEntity, SensorField, SensorValue,
};
pub use error::CoreError;
pub use model::{Voucher, VoucherStatus};
pub use options::{OptionBounds, OptionKey, OptionStore};
pub use snapshot::Snapshot;
