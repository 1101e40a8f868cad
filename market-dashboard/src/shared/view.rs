/// Display state, one panel per screen region
///
/// The summary panel is written only by the poller and the watchlist panel
/// only by the watchlist worker. Each writer publishes whole panels, so a
/// reader never sees a mix of two cycles.
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::error::FetchError;
use super::types::{HealthStatus, MiniQuote, Summary, Watchlist, WatchlistEntry};

/// Status indicator for a region
#[derive(Debug, Clone, PartialEq)]
pub enum PanelStatus {
    /// Nothing fetched yet
    Loading,
    /// Last cycle succeeded
    Ok {
        at: DateTime<Utc>,
        latency_ms: Option<u64>,
    },
    /// Last cycle failed; message is shown inline
    Error { at: DateTime<Utc>, message: String },
}

impl PanelStatus {
    pub fn error(err: &FetchError) -> Self {
        PanelStatus::Error {
            at: Utc::now(),
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PanelStatus::Error { .. })
    }
}

/// Summary region: last good snapshot plus the status of the latest cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPanel {
    pub last: Option<Summary>,
    pub status: PanelStatus,
    pub health: Option<HealthStatus>,
}

impl Default for SummaryPanel {
    fn default() -> Self {
        Self {
            last: None,
            status: PanelStatus::Loading,
            health: None,
        }
    }
}

impl SummaryPanel {
    /// Replace the snapshot entirely.
    pub fn succeeded(&mut self, summary: Summary, latency: Duration) {
        self.last = Some(summary);
        self.status = PanelStatus::Ok {
            at: Utc::now(),
            latency_ms: Some(latency.as_millis() as u64),
        };
    }

    /// Keep the last good snapshot visible and flag the failure.
    pub fn failed(&mut self, err: &FetchError) {
        self.status = PanelStatus::error(err);
    }
}

/// A watchlist row: the entry and its mini quote, if the backend had one
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistRow {
    pub entry: WatchlistEntry,
    pub quote: Option<MiniQuote>,
}

/// Result of one list + miniquotes cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchlistSnapshot {
    pub watchlist: Watchlist,
    pub quotes: Vec<MiniQuote>,
}

impl WatchlistSnapshot {
    /// Rows in watchlist order
    pub fn rows(&self) -> Vec<WatchlistRow> {
        self.watchlist
            .symbols
            .iter()
            .map(|entry| WatchlistRow {
                entry: entry.clone(),
                quote: self
                    .quotes
                    .iter()
                    .find(|q| q.symbol.eq_ignore_ascii_case(&entry.symbol))
                    .cloned(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.watchlist.is_empty()
    }
}

/// Watchlist region
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistPanel {
    pub snapshot: WatchlistSnapshot,
    pub status: PanelStatus,
}

impl Default for WatchlistPanel {
    fn default() -> Self {
        Self {
            snapshot: WatchlistSnapshot::default(),
            status: PanelStatus::Loading,
        }
    }
}

impl WatchlistPanel {
    pub fn loaded(snapshot: WatchlistSnapshot) -> Self {
        Self {
            snapshot,
            status: PanelStatus::Ok {
                at: Utc::now(),
                latency_ms: None,
            },
        }
    }

    /// Explicit empty state; stale rows are never kept after a failed read.
    pub fn failed(err: &FetchError) -> Self {
        Self {
            snapshot: WatchlistSnapshot::default(),
            status: PanelStatus::error(err),
        }
    }
}

/// Everything on screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub summary: SummaryPanel,
    pub watchlist: WatchlistPanel,
}
