// ── Poll coordinator ──
//
// Full lifecycle management for one controller connection: platform
// detection, session authentication, a background refresh task on a
// fixed cadence, snapshot publication, and action dispatch for the
// button adapters. One coordinator owns exactly one client handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use vouchly_api::models::CreateVoucherRequest;
use vouchly_api::{HotspotClient, TlsMode, TransportConfig};

use crate::config::ConnectionConfig;
use crate::error::CoreError;
use crate::model::Voucher;
use crate::options::{OptionKey, OptionStore};
use crate::snapshot::Snapshot;

/// A named coordinator operation, dispatched by button adapters via
/// [`Coordinator::press`].
///
/// `CreateVouchers` is not idempotent -- every dispatch creates a fresh
/// batch from the current option values. `DeleteVoucher` is idempotent
/// from the controller's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorAction {
    /// Create a voucher batch parameterized by the stored options.
    CreateVouchers,
    /// Delete one voucher by its controller id.
    DeleteVoucher { id: String },
}

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Constructed once per
/// configured connection and passed explicitly to every adapter -- there
/// is no global registry.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: ConnectionConfig,
    /// The connection handle. Exclusively owned; `None` before connect
    /// and after close.
    client: Mutex<Option<HotspotClient>>,
    /// Current snapshot, replaced wholesale on every refresh.
    snapshot: watch::Sender<Arc<Snapshot>>,
    options: OptionStore,
    cancel: CancellationToken,
    /// Child token for the current connection -- cancelled on close.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl Coordinator {
    /// Create a new coordinator from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and start the
    /// background refresh task.
    pub fn new(config: ConnectionConfig) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::default()));
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client: Mutex::new(None),
                snapshot,
                options: OptionStore::new(),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Create a coordinator with a pre-built client, skipping platform
    /// detection and login. No background task is spawned; drive
    /// [`refresh()`](Self::refresh) manually.
    pub fn with_client(config: ConnectionConfig, client: HotspotClient) -> Self {
        let coordinator = Self::new(config);
        *coordinator
            .inner
            .client
            .try_lock()
            .expect("fresh coordinator lock")
            = Some(client);
        coordinator
    }

    /// Access the connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the controller.
    ///
    /// Detects the platform, authenticates, performs an initial refresh,
    /// and spawns the periodic refresh task. Connect-time failures
    /// propagate -- the swallow-and-flag policy applies only to the
    /// steady-state poll loop.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let url = self.inner.config.url()?;
        self.connect_to(url).await
    }

    /// Connect to a controller at an explicit base URL.
    ///
    /// [`connect()`](Self::connect) derives `https://{host}:{port}` from
    /// the configuration; this variant accepts any base URL instead.
    pub async fn connect_to(&self, url: Url) -> Result<(), CoreError> {
        if self.is_closed() {
            return Err(CoreError::CoordinatorClosed);
        }

        let config = &self.inner.config;

        let transport = TransportConfig {
            tls: if config.verify_tls {
                TlsMode::System
            } else {
                TlsMode::DangerAcceptInvalid
            },
            timeout: config.timeout,
            cookie_jar: None,
        };

        let platform = HotspotClient::detect_platform(&url, &transport).await?;
        debug!(?platform, "detected controller platform");

        let client = HotspotClient::new(url, config.site.clone(), platform, &transport)?;
        client.login(&config.username, &config.password).await?;
        info!(site = %config.site, "authenticated with controller");

        *self.inner.client.lock().await = Some(client);

        // Initial pull so consumers see data before the first tick.
        self.refresh().await;

        self.spawn_refresh_task().await;
        Ok(())
    }

    async fn spawn_refresh_task(&self) {
        let interval_secs = self.inner.config.refresh_interval_secs;
        if interval_secs == 0 {
            return;
        }

        let child = self.inner.cancel.child_token();
        {
            // A reconnect must stop the previous poll task, or `close()`
            // would wait forever on a task whose token nobody cancels.
            let mut active = self.inner.cancel_child.lock().await;
            active.cancel();
            *active = child.clone();
        }

        let coordinator = self.clone();
        let handle = tokio::spawn(refresh_task(coordinator, interval_secs, child));
        self.inner.task_handles.lock().await.push(handle);
    }

    /// Close the coordinator.
    ///
    /// Cancels the background task, logs out (best-effort), and releases
    /// the connection handle. After this returns no further remote calls
    /// are issued; [`is_closed()`](Self::is_closed) reports `true`.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        if let Some(client) = self.inner.client.lock().await.take() {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }

        debug!("coordinator closed");
    }

    /// Whether [`close()`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    // ── Refresh cycle ────────────────────────────────────────────

    /// Execute one refresh cycle and publish the resulting snapshot.
    ///
    /// Never fails: every enumerated client error is logged and degrades
    /// the snapshot's `available` flag instead, keeping the previous
    /// voucher list as stale data. The next scheduled cycle retries.
    /// Exactly one snapshot is produced per invocation, and it is always
    /// total (`available` and `last_pull` are set whatever the outcome).
    pub async fn refresh(&self) -> Arc<Snapshot> {
        let pulled_at = Utc::now();
        let previous = self.snapshot();

        let guard = self.inner.client.lock().await;
        let next = match guard.as_ref() {
            Some(client) => match client.list_vouchers().await {
                Ok(records) => {
                    let vouchers: Vec<Arc<Voucher>> = records
                        .into_iter()
                        .map(|r| Arc::new(Voucher::from(r)))
                        .collect();
                    debug!(count = vouchers.len(), "voucher pull succeeded");
                    Snapshot {
                        last_pull: Some(pulled_at),
                        available: true,
                        vouchers,
                    }
                }
                Err(e) => {
                    if e.is_auth_expired() {
                        error!(error = %e, "voucher pull failed: authentication");
                    } else if e.is_transient() {
                        warn!(error = %e, "voucher pull failed; retrying next cycle");
                    } else {
                        warn!(error = %e, "voucher pull failed");
                    }
                    Snapshot {
                        last_pull: Some(pulled_at),
                        available: false,
                        vouchers: previous.vouchers.clone(),
                    }
                }
            },
            None => {
                debug!("refresh without connection");
                Snapshot {
                    last_pull: Some(pulled_at),
                    available: false,
                    vouchers: previous.vouchers.clone(),
                }
            }
        };
        drop(guard);

        let next = Arc::new(next);
        self.inner.snapshot.send_replace(Arc::clone(&next));
        next
    }

    // ── Snapshot observation ─────────────────────────────────────

    /// The current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot publications.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.snapshot.subscribe()
    }

    // ── Options ──────────────────────────────────────────────────

    /// Current value of a voucher option (default until set).
    pub fn option(&self, key: OptionKey) -> u64 {
        self.inner.options.get(key)
    }

    /// Set a voucher option, rejecting out-of-range values.
    pub fn set_option(&self, key: OptionKey, value: u64) -> Result<(), CoreError> {
        self.inner.options.set(key, value)
    }

    /// All option values in declaration order.
    pub fn options(&self) -> Vec<(OptionKey, u64)> {
        self.inner.options.all()
    }

    // ── Action dispatch ──────────────────────────────────────────

    /// Dispatch a named operation (button-adapter entry point).
    ///
    /// A successful mutation triggers a refresh so the published snapshot
    /// reflects it. Failures are returned, not swallowed.
    pub async fn press(&self, action: CoordinatorAction) -> Result<(), CoreError> {
        if self.is_closed() {
            return Err(CoreError::CoordinatorClosed);
        }

        match action {
            CoordinatorAction::CreateVouchers => self.create_vouchers().await?,
            CoordinatorAction::DeleteVoucher { id } => self.delete_voucher(&id).await?,
        }

        self.refresh().await;
        Ok(())
    }

    /// Create a voucher batch from the stored option values.
    async fn create_vouchers(&self) -> Result<(), CoreError> {
        let guard = self.inner.client.lock().await;
        let client = guard.as_ref().ok_or(CoreError::CoordinatorClosed)?;

        let usage_quota = self.option(OptionKey::VoucherUsageQuota);
        let req = CreateVoucherRequest {
            count: u32::try_from(self.option(OptionKey::VoucherNumber)).unwrap_or(u32::MAX),
            quota: u32::try_from(self.option(OptionKey::VoucherQuota)).unwrap_or(u32::MAX),
            duration_minutes: u32::try_from(self.option(OptionKey::VoucherDuration))
                .unwrap_or(u32::MAX),
            usage_quota_mb: (usage_quota > 0).then_some(usage_quota),
            rx_rate_limit_kbps: None,
            tx_rate_limit_kbps: None,
            note: None,
        };

        let results = client.create_vouchers(&req).await?;
        info!(count = req.count, batches = results.len(), "vouchers created");
        Ok(())
    }

    async fn delete_voucher(&self, id: &str) -> Result<(), CoreError> {
        // Only ids from the published snapshot are deletable; anything
        // else is refused before a command is sent.
        if !self.snapshot().vouchers.iter().any(|v| v.id == id) {
            return Err(CoreError::VoucherNotFound {
                identifier: id.to_owned(),
            });
        }

        let guard = self.inner.client.lock().await;
        let client = guard.as_ref().ok_or(CoreError::CoordinatorClosed)?;

        client.delete_voucher(id).await?;
        info!(%id, "voucher deleted");
        Ok(())
    }
}

/// Periodically refresh voucher data from the controller.
async fn refresh_task(coordinator: Coordinator, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                coordinator.refresh().await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn coordinator() -> Coordinator {
        Coordinator::new(ConnectionConfig {
            host: "10.0.0.1".into(),
            ..ConnectionConfig::default()
        })
    }

    #[test]
    fn initial_snapshot_is_unavailable_and_total() {
        let c = coordinator();
        let snap = c.snapshot();
        assert!(!snap.available);
        assert!(snap.last_pull.is_none());
        assert!(snap.is_empty());
    }

    #[tokio::test]
    async fn refresh_without_connection_degrades_but_never_fails() {
        let c = coordinator();
        let snap = c.refresh().await;
        assert!(!snap.available);
        assert!(snap.last_pull.is_some());
    }

    #[tokio::test]
    async fn refresh_publishes_to_subscribers() {
        let c = coordinator();
        let mut rx = c.subscribe();
        c.refresh().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().last_pull.is_some());
    }

    #[test]
    fn options_round_trip_through_coordinator() {
        let c = coordinator();
        c.set_option(OptionKey::VoucherQuota, 5).unwrap();
        assert_eq!(c.option(OptionKey::VoucherQuota), 5);
    }

    #[tokio::test]
    async fn press_after_close_is_rejected() {
        let c = coordinator();
        c.close().await;
        assert!(c.is_closed());

        let result = c.press(CoordinatorAction::CreateVouchers).await;
        assert!(matches!(result, Err(CoreError::CoordinatorClosed)));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_refused_locally() {
        let c = coordinator();
        let result = c
            .press(CoordinatorAction::DeleteVoucher { id: "nope".into() })
            .await;
        assert!(matches!(
            result,
            Err(CoreError::VoucherNotFound { ref identifier }) if identifier == "nope"
        ));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let c = coordinator();
        c.close().await;
        c.close().await;
        assert!(c.is_closed());
    }

    #[tokio::test]
    async fn failed_refresh_preserves_options() {
        let c = coordinator();
        c.set_option(OptionKey::VoucherDuration, 720).unwrap();

        let snap = c.refresh().await;
        assert!(!snap.available);
        assert_eq!(c.option(OptionKey::VoucherDuration), 720);
    }
}
