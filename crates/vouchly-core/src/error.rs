// ── Core error types ──
//
// User-facing errors from vouchly-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<vouchly_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

use crate::options::OptionKey;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The coordinator has been closed; no further remote calls are issued.
    #[error("Coordinator is closed")]
    CoordinatorClosed,

    // ── Option errors ────────────────────────────────────────────────
    /// A numeric write outside the declared bounds. Rejected, never clamped.
    #[error("Value {value} for {key} is out of range ({min}..={max})")]
    OptionOutOfRange {
        key: OptionKey,
        value: u64,
        min: u64,
        max: u64,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Voucher not found: {identifier}")]
    VoucherNotFound { identifier: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vouchly_api::Error> for CoreError {
    fn from(err: vouchly_api::Error) -> Self {
        match err {
            vouchly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            vouchly_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            vouchly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            vouchly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vouchly_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            vouchly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vouchly_api::Error::Api { message } => CoreError::Api { message },
            vouchly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
