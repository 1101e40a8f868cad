//! Summary refresh loop
//!
//! One cycle: Idle -> Fetching -> Rendering | Failed -> Idle. Cycles never
//! overlap: the loop awaits each fetch before looking at the timer again.
//! A tick that elapses mid-fetch is consumed without a cycle, so the next
//! regular tick picks it up. Manual refresh requests that arrive mid-cycle
//! are dropped. Failures are published as a status and the
//! loop carries on with the next scheduled tick.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::backend::MarketBackend;
use super::error::FetchError;
use super::normalize::normalize;
use super::view::SummaryPanel;

/// Poller lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Rendering,
    Failed,
}

/// Poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between scheduled refreshes
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

impl PollerConfig {
    /// Set refresh interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// What a single cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Rendered { latency: Duration },
    Failed(FetchError),
}

/// Owns the summary refresh loop and the summary panel
pub struct DashboardPoller<B> {
    backend: Arc<B>,
    config: PollerConfig,
    state: PollState,
    panel: SummaryPanel,
    panel_tx: watch::Sender<SummaryPanel>,
}

impl<B: MarketBackend> DashboardPoller<B> {
    pub fn new(
        backend: Arc<B>,
        config: PollerConfig,
        panel_tx: watch::Sender<SummaryPanel>,
    ) -> Self {
        Self {
            backend,
            config,
            state: PollState::Idle,
            panel: SummaryPanel::default(),
            panel_tx,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn panel(&self) -> &SummaryPanel {
        &self.panel
    }

    fn transition(&mut self, next: PollState) {
        debug!("poller {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn publish(&self) {
        self.panel_tx.send_replace(self.panel.clone());
    }

    /// Fetch backend health once; failure only gets logged.
    pub async fn check_health(&mut self) {
        match self.backend.health().await {
            Ok(health) => {
                info!(
                    "Backend health: {} ({}/{} sources up)",
                    health.status,
                    health.sources_up(),
                    health.sources.len()
                );
                self.panel.health = Some(health);
                self.publish();
            }
            Err(e) => warn!("Backend health check failed: {}", e),
        }
    }

    /// Run one fetch -> normalize -> publish cycle.
    pub async fn poll_once(&mut self) -> PollOutcome {
        self.transition(PollState::Fetching);
        let started = Instant::now();

        let result = match self.backend.summary().await {
            Ok(raw) => normalize(&raw),
            Err(e) => Err(e),
        };
        let latency = started.elapsed();

        let outcome = match result {
            Ok(summary) => {
                self.transition(PollState::Rendering);
                info!(
                    "Summary refreshed in {} ms (as_of {}, {} indices, {} sectors)",
                    latency.as_millis(),
                    summary.as_of,
                    summary.indices.len(),
                    summary.sectors.len()
                );
                self.panel.succeeded(summary, latency);
                PollOutcome::Rendered { latency }
            }
            Err(e) => {
                self.transition(PollState::Failed);
                warn!("Summary refresh failed ({}): {}", e.kind(), e);
                self.panel.failed(&e);
                PollOutcome::Failed(e)
            }
        };

        self.publish();
        self.transition(PollState::Idle);
        outcome
    }

    /// Poll immediately, then on every interval tick or manual request,
    /// until the request channel closes.
    pub async fn run(mut self, mut refresh_rx: mpsc::Receiver<()>) {
        info!("Starting summary poller (every {:?})", self.config.interval);
        self.check_health().await;

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                request = refresh_rx.recv() => {
                    if request.is_none() {
                        info!("Refresh channel closed, stopping poller");
                        return;
                    }
                    debug!("Manual refresh requested");
                }
            }

            self.poll_once().await;

            // An overdue tick would start a cycle right away; with `Skip` the
            // next deadline lands back on the regular grid
            if ticker.tick().now_or_never().is_some() {
                debug!("Tick elapsed during fetch, waiting for the next one");
            }

            // Requests that piled up during the cycle are not replayed
            while refresh_rx.try_recv().is_ok() {}
        }
    }
}

/// Spawn the poller on the runtime; returns the manual-refresh handle.
pub fn spawn_poller<B: MarketBackend + 'static>(
    poller: DashboardPoller<B>,
) -> (mpsc::Sender<()>, tokio::task::JoinHandle<()>) {
    let (refresh_tx, refresh_rx) = mpsc::channel(1);
    let handle = tokio::spawn(poller.run(refresh_rx));
    (refresh_tx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_support::{FakeBackend, summary_payload};
    use crate::shared::view::PanelStatus;
    use std::sync::atomic::Ordering;

    fn poller(backend: Arc<FakeBackend>) -> (DashboardPoller<FakeBackend>, watch::Receiver<SummaryPanel>) {
        let (tx, rx) = watch::channel(SummaryPanel::default());
        (DashboardPoller::new(backend, PollerConfig::default(), tx), rx)
    }

    #[tokio::test]
    async fn test_poll_once_renders() {
        let backend = Arc::new(FakeBackend::new());
        let (mut poller, rx) = poller(Arc::clone(&backend));

        let outcome = poller.poll_once().await;
        assert!(matches!(outcome, PollOutcome::Rendered { .. }));
        assert_eq!(poller.state(), PollState::Idle);

        let panel = rx.borrow();
        assert!(matches!(panel.status, PanelStatus::Ok { .. }));
        assert_eq!(panel.last.as_ref().map(|s| s.indices.len()), Some(2));
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_previous_data_then_recovers() {
        let backend = Arc::new(FakeBackend::new());
        let (mut poller, rx) = poller(Arc::clone(&backend));

        poller.poll_once().await;
        let first = rx.borrow().last.clone();
        assert!(first.is_some());

        backend.fail_next_summaries(1);
        let outcome = poller.poll_once().await;
        assert!(matches!(
            outcome,
            PollOutcome::Failed(FetchError::HttpStatus { status: 500, .. })
        ));
        assert_eq!(poller.state(), PollState::Idle);
        {
            let panel = rx.borrow();
            assert!(panel.status.is_error());
            assert_eq!(panel.last, first);
        }

        backend.set_summary(summary_payload("2025-03-14T15:31:00", -1.25));
        poller.poll_once().await;
        let panel = rx.borrow();
        assert!(!panel.status.is_error());
        let summary = panel.last.as_ref().unwrap();
        assert_eq!(summary.as_of, "2025-03-14T15:31:00");
        assert_eq!(summary.indices[0].pct, -1.25);
    }

    #[tokio::test]
    async fn test_unparseable_summary_is_a_failure() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_summary(serde_json::json!(["not", "an", "object"]));
        let (mut poller, rx) = poller(Arc::clone(&backend));

        let outcome = poller.poll_once().await;
        assert!(matches!(outcome, PollOutcome::Failed(FetchError::Parse(_))));
        assert!(rx.borrow().last.is_none());
        assert!(rx.borrow().status.is_error());
    }

    #[tokio::test]
    async fn test_check_health_publishes() {
        let backend = Arc::new(FakeBackend::new());
        let (mut poller, rx) = poller(backend);

        poller.check_health().await;
        let health = rx.borrow().health.clone().unwrap();
        assert_eq!(health.sources_up(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_schedule() {
        let backend = Arc::new(FakeBackend::new());
        let (poller, _rx) = poller(Arc::clone(&backend));
        let (refresh_tx, handle) = spawn_poller(poller);

        // First cycle fires immediately
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 1);

        // Manual refresh
        refresh_tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 2);

        // Next scheduled tick at t=60s, failure does not stop the loop
        backend.fail_next_summaries(1);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 3);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 4);

        drop(refresh_tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_during_slow_fetch_waits_for_next_tick() {
        let backend = Arc::new(FakeBackend::new());
        let (poller, _rx) = poller(Arc::clone(&backend));
        let started = tokio::time::Instant::now();
        let (refresh_tx, handle) = spawn_poller(poller);

        tokio::time::sleep(Duration::from_millis(10)).await;
        // Cycle at t=60s runs until t=130s, across the t=120s tick
        backend.delay_next_summary(Duration::from_secs(70));
        tokio::time::sleep(Duration::from_secs(200)).await;

        let starts: Vec<u64> = backend
            .summary_started
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.duration_since(started).as_secs())
            .collect();
        assert_eq!(starts, vec![0, 60, 180]);

        drop(refresh_tx);
        handle.await.unwrap();
    }
}
