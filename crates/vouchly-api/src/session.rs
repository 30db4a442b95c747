// Session authentication
//
// Cookie-based session login/logout and controller platform detection.
// The login endpoint sets a session cookie in the client's jar;
// subsequent requests use that cookie automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::ControllerPlatform;
use crate::client::HotspotClient;
use crate::error::Error;
use crate::transport::TransportConfig;

impl HotspotClient {
    /// Authenticate with the controller using username/password.
    ///
    /// On success the session cookie is stored in the client's cookie jar
    /// and used for all subsequent requests. The login endpoint differs
    /// by platform:
    /// - UniFi OS: `POST /api/auth/login`
    /// - Standalone: `POST /api/login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self
            .base_url()
            .join(self.platform().login_path())
            .map_err(Error::InvalidUrl)?;

        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        // Capture CSRF token from login response -- required for all
        // POST requests through the UniFi OS proxy.
        if let Some(token) = resp
            .headers()
            .get("X-CSRF-Token")
            .or_else(|| resp.headers().get("x-csrf-token"))
            .and_then(|v| v.to_str().ok())
        {
            self.set_csrf_token(token.to_owned());
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// Platform-specific logout endpoint:
    /// - UniFi OS: `POST /api/auth/logout`
    /// - Standalone: `POST /api/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self
            .base_url()
            .join(self.platform().logout_path())
            .map_err(Error::InvalidUrl)?;

        debug!("logging out at {}", url);

        let _resp = self
            .http()
            .post(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!("logout complete");
        Ok(())
    }

    /// Probe the controller to decide which platform is behind `base_url`.
    ///
    /// Only UniFi OS serves `/api/auth/login`, so any response there other
    /// than 404 settles the question. Otherwise the standalone login path
    /// is probed; if that fails too the controller is unreachable.
    ///
    /// The probe client is built from `transport` so it honors the
    /// caller's TLS mode and timeout.
    pub async fn detect_platform(
        base_url: &Url,
        transport: &TransportConfig,
    ) -> Result<ControllerPlatform, Error> {
        let probe = transport.build_client()?;

        let unifi_os_url = base_url
            .join("/api/auth/login")
            .map_err(Error::InvalidUrl)?;
        debug!("probing {}", unifi_os_url);

        if let Ok(resp) = probe.get(unifi_os_url).send().await {
            if resp.status() != reqwest::StatusCode::NOT_FOUND {
                debug!("UniFi OS controller detected");
                return Ok(ControllerPlatform::UnifiOs);
            }
        }

        let classic_url = base_url.join("/api/login").map_err(Error::InvalidUrl)?;
        debug!("probing {}", classic_url);

        match probe.get(classic_url).send().await {
            Ok(_) => {
                debug!("standalone controller detected");
                Ok(ControllerPlatform::ClassicController)
            }
            Err(e) if e.is_timeout() => Err(Error::Timeout {
                timeout_secs: transport.timeout.as_secs(),
            }),
            Err(e) => Err(Error::Transport(e)),
        }
    }
}
