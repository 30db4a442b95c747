//! Async client for the UniFi controller's legacy guest-hotspot voucher API.
//!
//! The voucher endpoints live exclusively on the legacy (session-auth) API
//! surface: `stat/voucher` for listing and `cmd/hotspot` for create/delete.
//! This crate wraps them behind [`HotspotClient`], handling:
//!
//! - Cookie-based session login/logout and CSRF token rotation (UniFi OS)
//! - Platform detection (UniFi OS vs. standalone Network Application) and
//!   the corresponding `/proxy/network` path prefixing
//! - The `{ meta: { rc, msg }, data: [] }` response envelope
//!
//! Everything returned to callers is wire-shaped (raw [`VoucherRecord`]s);
//! domain conversion is the consumer's job.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;
pub mod vouchers;

pub use auth::ControllerPlatform;
pub use client::HotspotClient;
pub use error::Error;
pub use models::{CreateVoucherRequest, LegacyMeta, LegacyResponse, VoucherRecord};
pub use transport::{TlsMode, TransportConfig};
