// ── Runtime connection configuration ──
//
// Describes *how* to reach a controller. Carries credential data and
// connection tuning, but never touches disk. The CLI (or any other host)
// constructs a `ConnectionConfig` once and hands it to the Coordinator;
// it is immutable for the coordinator's lifetime.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Default refresh cadence in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Controller host (IP address or hostname, no scheme).
    pub host: String,
    /// HTTPS port (443 for UniFi OS, 8443 for standalone).
    pub port: u16,
    /// Site to operate on.
    pub site: String,
    /// Local admin username for session auth.
    pub username: String,
    /// Local admin password.
    pub password: SecretString,
    /// Verify the controller's TLS certificate. Off by default --
    /// local controllers almost always use self-signed certificates.
    pub verify_tls: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// How often the background task refreshes (seconds). 0 = never.
    pub refresh_interval_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 443,
            site: "default".into(),
            username: String::new(),
            password: SecretString::from(String::new()),
            verify_tls: false,
            timeout: Duration::from_secs(30),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl ConnectionConfig {
    /// The controller base URL: `https://{host}:{port}`.
    pub fn url(&self) -> Result<Url, CoreError> {
        if self.host.is_empty() {
            return Err(CoreError::Config {
                message: "controller host is not set".into(),
            });
        }
        let raw = format!("https://{}:{}", self.host, self.port);
        raw.parse().map_err(|e| CoreError::Config {
            message: format!("invalid controller address {raw:?}: {e}"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_from_host_and_port() {
        let config = ConnectionConfig {
            host: "10.0.0.1".into(),
            ..ConnectionConfig::default()
        };
        // Url normalizes away the default https port.
        assert_eq!(config.url().unwrap().as_str(), "https://10.0.0.1/");

        let standalone = ConnectionConfig {
            host: "unifi.lan".into(),
            port: 8443,
            ..ConnectionConfig::default()
        };
        assert_eq!(standalone.url().unwrap().as_str(), "https://unifi.lan:8443/");
    }

    #[test]
    fn url_rejects_empty_host() {
        let config = ConnectionConfig::default();
        assert!(matches!(config.url(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn defaults_match_controller_conventions() {
        let config = ConnectionConfig::default();
        assert_eq!(config.port, 443);
        assert_eq!(config.site, "default");
        assert!(!config.verify_tls);
        assert_eq!(config.refresh_interval_secs, 300);
    }
}
