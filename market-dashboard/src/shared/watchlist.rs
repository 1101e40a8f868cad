//! Watchlist store and worker
//!
//! The store is a thin CRUD facade: every call goes to the backend and no
//! local copy is trusted after a mutation. The worker serializes user actions
//! (mutate, then re-list, then re-quote) and is the only writer of the
//! watchlist panel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::backend::MarketBackend;
use super::error::FetchError;
use super::normalize::normalize_mini_quotes;
use super::types::{MiniQuote, Watchlist, WatchlistEntry};
use super::view::{PanelStatus, WatchlistPanel, WatchlistSnapshot};

/// Identity key for a watchlist symbol
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// CRUD facade over `/api/watchlist` and `/api/miniquotes`
pub struct WatchlistStore<B> {
    backend: Arc<B>,
}

impl<B> Clone for WatchlistStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: MarketBackend> WatchlistStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Watchlist, FetchError> {
        self.backend.watchlist().await
    }

    /// Upsert entries. Symbols are trimmed and upper-cased; blank ones are
    /// dropped, and if none remain no request is sent.
    pub async fn add(&self, entries: Vec<WatchlistEntry>) -> Result<Watchlist, FetchError> {
        let entries: Vec<WatchlistEntry> = entries
            .into_iter()
            .map(|mut entry| {
                entry.symbol = normalize_symbol(&entry.symbol);
                entry.notes = entry
                    .notes
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty());
                entry
            })
            .filter(|entry| !entry.symbol.is_empty())
            .collect();

        if entries.is_empty() {
            debug!("add called with no usable symbols, re-listing");
            return self.list().await;
        }

        info!(
            "Adding to watchlist: {}",
            entries
                .iter()
                .map(|e| e.symbol.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        self.backend.add_to_watchlist(&entries).await
    }

    /// Remove a symbol. Removing an absent symbol succeeds with the list
    /// unchanged, including when the backend answers 404.
    pub async fn remove(&self, symbol: &str) -> Result<Watchlist, FetchError> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return self.list().await;
        }

        info!("Removing from watchlist: {}", symbol);
        match self.backend.remove_from_watchlist(&symbol).await {
            Err(err) if err.is_not_found() => {
                debug!("{} not on watchlist, nothing to remove", symbol);
                self.list().await
            }
            other => other,
        }
    }

    /// Mini quotes for `symbols`; an empty set short-circuits without a request.
    pub async fn mini_quotes(&self, symbols: &[String]) -> Result<Vec<MiniQuote>, FetchError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let raw = self.backend.mini_quotes(symbols).await?;
        normalize_mini_quotes(&raw)
    }

    /// Ordered list -> miniquotes cycle.
    pub async fn refresh(&self) -> Result<WatchlistSnapshot, FetchError> {
        let watchlist = self.list().await?;
        let quotes = self.mini_quotes(&watchlist.symbols()).await?;
        Ok(WatchlistSnapshot { watchlist, quotes })
    }
}

/// User-initiated watchlist action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistAction {
    Refresh,
    Add(Vec<WatchlistEntry>),
    Remove(String),
}

/// Apply one action and produce the next panel.
///
/// A failed mutation is still followed by a refresh so the panel shows what
/// the backend actually holds, with the mutation error as the status.
pub async fn apply_action<B: MarketBackend>(
    store: &WatchlistStore<B>,
    action: WatchlistAction,
) -> WatchlistPanel {
    let mutation = match action {
        WatchlistAction::Refresh => Ok(()),
        WatchlistAction::Add(entries) => store.add(entries).await.map(|_| ()),
        WatchlistAction::Remove(symbol) => store.remove(&symbol).await.map(|_| ()),
    };

    match (mutation, store.refresh().await) {
        (Ok(()), Ok(snapshot)) => WatchlistPanel::loaded(snapshot),
        (Err(err), Ok(snapshot)) => {
            warn!("Watchlist update failed: {}", err);
            WatchlistPanel {
                snapshot,
                status: PanelStatus::error(&err),
            }
        }
        (_, Err(err)) => {
            warn!("Watchlist refresh failed: {}", err);
            WatchlistPanel::failed(&err)
        }
    }
}

/// Spawn the watchlist worker. It refreshes once on start, then handles
/// actions one at a time until the action channel closes.
pub fn spawn_watchlist_worker<B: MarketBackend + 'static>(
    store: WatchlistStore<B>,
    mut action_rx: mpsc::Receiver<WatchlistAction>,
    panel_tx: watch::Sender<WatchlistPanel>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        panel_tx.send_replace(apply_action(&store, WatchlistAction::Refresh).await);

        while let Some(action) = action_rx.recv().await {
            debug!("Watchlist action: {:?}", action);
            panel_tx.send_replace(apply_action(&store, action).await);
        }

        debug!("Watchlist action channel closed, worker stopping");
    })
}
