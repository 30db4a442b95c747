//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use vouchly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(vouchly::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             URL: {url}\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(vouchly::auth_failed),
        help(
            "Verify the username and password.\n\
             A local admin account is required; UniFi Cloud SSO accounts\n\
             cannot use session login."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials provided")]
    #[diagnostic(
        code(vouchly::no_credentials),
        help(
            "Pass --username and --password, or set the VOUCHLY_USERNAME\n\
             and VOUCHLY_PASSWORD environment variables."
        )
    )]
    NoCredentials,

    // ── Resources ────────────────────────────────────────────────────
    #[error("Voucher '{identifier}' not found")]
    #[diagnostic(
        code(vouchly::not_found),
        help("Run: vouchly list to see available vouchers")
    )]
    NotFound { identifier: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller rejected the request: {message}")]
    #[diagnostic(code(vouchly::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vouchly::validation))]
    Validation { field: String, reason: String },

    #[error("Missing required argument: {field}")]
    #[diagnostic(
        code(vouchly::missing_argument),
        help("Pass --{field} or set the matching VOUCHLY_* environment variable.")
    )]
    MissingArgument { field: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(vouchly::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::MissingArgument { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::CoordinatorClosed => CliError::ApiError {
                message: "Coordinator is closed".into(),
            },

            CoreError::OptionOutOfRange {
                key,
                value,
                min,
                max,
            } => CliError::Validation {
                field: key.to_string(),
                reason: format!("{value} is out of range ({min}..={max})"),
            },

            CoreError::VoucherNotFound { identifier } => CliError::NotFound { identifier },

            CoreError::Api { message } => CliError::ApiError { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}
