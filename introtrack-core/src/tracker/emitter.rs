//! Fire-and-forget event delivery
//!
//! `track` must never block the caller, never panic, and never report
//! failure: a lost event is an accepted tradeoff, a disrupted user journey
//! is not. Delivery happens on a spawned task ([`Tracker`]) or a dedicated
//! worker thread ([`BlockingTracker`]); the outcome is only visible in the
//! logs and the delivery counters.
//!
//! There is no retry, no batching, and no offline queue. One `track` call
//! is exactly one write attempt.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::config::CollectorConfig;
use crate::error::{Error, Result};

use super::event::EventRecord;

/// Write-side delivery strategy
///
/// The production implementation is [`HttpEventTransport`]; tests swap in
/// transports that fail on purpose.
pub trait EventTransport: Send + Sync + 'static {
    /// Attempt to deliver one event. Called once per record, no retries.
    fn deliver(&self, record: EventRecord) -> impl Future<Output = Result<()>> + Send;
}

/// Unacknowledged POST to the collector write endpoint
///
/// The response is never read: the collector gives no acknowledgment the
/// emitter would act on, and the original deployment could not even observe
/// one (the write was a no-cors POST).
pub struct HttpEventTransport {
    http_client: reqwest::Client,
    url: String,
}

impl HttpEventTransport {
    /// Create a transport from configuration
    ///
    /// Returns an error if the configuration is invalid or missing the URL.
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        config.validate()?;

        let url = config
            .url
            .clone()
            .ok_or_else(|| Error::Config("collector.url is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client, url })
    }
}

impl EventTransport for HttpEventTransport {
    fn deliver(&self, record: EventRecord) -> impl Future<Output = Result<()>> + Send {
        async move {
            let response = self
                .http_client
                .post(&self.url)
                .json(&record)
                .send()
                .await
                .map_err(|e| Error::Transport(format!("HTTP request failed: {}", e)))?;

            // Fire-and-forget: status and body are intentionally not inspected
            drop(response);
            Ok(())
        }
    }
}

/// Delivery counters, for diagnostics only
///
/// `attempted` counts writes handed to the transport; `failed` counts the
/// ones the transport reported as lost. Neither is ever acted upon.
#[derive(Debug, Default)]
pub struct TrackerStats {
    attempted: AtomicU64,
    failed: AtomicU64,
}

impl TrackerStats {
    /// Number of delivery attempts so far
    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::Relaxed)
    }

    /// Number of attempts the transport reported as failed
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fire-and-forget tracker for async callers
///
/// Each `track` call spawns one delivery task on the runtime the tracker
/// was created in and returns immediately. If the tracker outlives that
/// runtime, later `track` calls still return normally but their delivery
/// tasks are dropped without running: the events are lost, which the
/// fire-and-forget contract already permits.
pub struct Tracker<T: EventTransport> {
    transport: Arc<T>,
    handle: tokio::runtime::Handle,
    stats: Arc<TrackerStats>,
}

impl Tracker<HttpEventTransport> {
    /// Create a tracker pointed at the configured collector
    ///
    /// Returns `None` when no collector URL is configured (tracking disabled).
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &CollectorConfig) -> Result<Option<Self>> {
        if !config.is_ready() {
            return Ok(None);
        }
        Ok(Some(Self::new(HttpEventTransport::new(config)?)))
    }
}

impl<T: EventTransport> Tracker<T> {
    /// Create a tracker with an explicit transport
    ///
    /// Must be called from within a Tokio runtime; delivery tasks are
    /// spawned on that runtime.
    pub fn new(transport: T) -> Self {
        Self::with_handle(transport, tokio::runtime::Handle::current())
    }

    /// Create a tracker that spawns delivery tasks on the given runtime handle
    pub fn with_handle(transport: T, handle: tokio::runtime::Handle) -> Self {
        Self {
            transport: Arc::new(transport),
            handle,
            stats: Arc::new(TrackerStats::default()),
        }
    }

    /// Record an event: construct, stamp, dispatch, return
    ///
    /// Never blocks on network I/O, never panics, never reports failure.
    pub fn track(&self, event_type: impl Into<String>, data: serde_json::Value) {
        self.dispatch(EventRecord::new(event_type, data));
    }

    /// Dispatch an already-constructed record
    pub fn dispatch(&self, record: EventRecord) {
        let transport = Arc::clone(&self.transport);
        let stats = Arc::clone(&self.stats);

        self.handle.spawn(async move {
            stats.record_attempt();
            if let Err(e) = transport.deliver(record).await {
                stats.record_failure();
                tracing::warn!(error = %e, "analytics send failed");
            }
        });
    }

    /// Delivery counters
    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }
}

/// Fire-and-forget tracker for synchronous callers
///
/// A dedicated worker thread owns a current-thread runtime and drains a
/// channel of records; `track` is a non-blocking channel send. Dropping the
/// tracker closes the channel and joins the worker, which delivers whatever
/// is still queued. That drain is what lets a short-lived CLI get its events
/// out before exit; callers still never observe delivery outcomes.
pub struct BlockingTracker {
    tx: Option<mpsc::Sender<EventRecord>>,
    worker: Option<std::thread::JoinHandle<()>>,
    stats: Arc<TrackerStats>,
}

impl BlockingTracker {
    /// Create a blocking tracker pointed at the configured collector
    ///
    /// Returns `None` when no collector URL is configured (tracking disabled).
    pub fn from_config(config: &CollectorConfig) -> Result<Option<Self>> {
        if !config.is_ready() {
            return Ok(None);
        }
        Ok(Some(Self::with_transport(HttpEventTransport::new(config)?)?))
    }

    /// Create a blocking tracker with an explicit transport
    pub fn with_transport<T: EventTransport>(transport: T) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<EventRecord>();
        let stats = Arc::new(TrackerStats::default());
        let worker_stats = Arc::clone(&stats);

        let worker = std::thread::Builder::new()
            .name("introtrack-tracker".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create tracker runtime; events will be dropped");
                        return;
                    }
                };

                while let Ok(record) = rx.recv() {
                    worker_stats.record_attempt();
                    if let Err(e) = runtime.block_on(transport.deliver(record)) {
                        worker_stats.record_failure();
                        tracing::warn!(error = %e, "analytics send failed");
                    }
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
            stats,
        })
    }

    /// Record an event: construct, stamp, enqueue, return
    ///
    /// Never blocks on network I/O, never panics, never reports failure.
    pub fn track(&self, event_type: impl Into<String>, data: serde_json::Value) {
        self.dispatch(EventRecord::new(event_type, data));
    }

    /// Dispatch an already-constructed record
    pub fn dispatch(&self, record: EventRecord) {
        if let Some(tx) = &self.tx {
            if tx.send(record).is_err() {
                tracing::warn!("tracker worker is gone; event dropped");
            }
        }
    }

    /// Delivery counters
    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    /// Drain queued events and stop the worker
    ///
    /// Equivalent to dropping the tracker; provided so call sites can make
    /// the drain explicit.
    pub fn shutdown(self) {}
}

impl Drop for BlockingTracker {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
