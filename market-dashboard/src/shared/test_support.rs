//! In-memory backend for unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;

use super::backend::MarketBackend;
use super::error::FetchError;
use super::types::{HealthStatus, Watchlist, WatchlistEntry};

pub struct FakeBackend {
    pub summary: Mutex<Value>,
    pub entries: Mutex<Vec<WatchlistEntry>>,
    pub series: Mutex<HashMap<String, Vec<f64>>>,
    /// Fail this many upcoming summary calls with HTTP 500
    pub failing_summaries: AtomicUsize,
    /// Answer DELETE of an unknown symbol with 404 instead of the list
    pub strict_delete: bool,
    /// Sleep this long inside the next summary call
    pub summary_delay: Mutex<Option<Duration>>,
    /// Start time of every summary call
    pub summary_started: Mutex<Vec<Instant>>,
    pub summary_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub mini_quote_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            summary: Mutex::new(summary_payload("2025-03-14T15:30:00", 0.42)),
            entries: Mutex::new(Vec::new()),
            series: Mutex::new(HashMap::new()),
            failing_summaries: AtomicUsize::new(0),
            strict_delete: false,
            summary_delay: Mutex::new(None),
            summary_started: Mutex::new(Vec::new()),
            summary_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            mini_quote_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_next_summaries(&self, n: usize) {
        self.failing_summaries.store(n, Ordering::SeqCst);
    }

    pub fn delay_next_summary(&self, delay: Duration) {
        *self.summary_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_summary(&self, payload: Value) {
        *self.summary.lock().unwrap() = payload;
    }

    fn snapshot(&self) -> Watchlist {
        Watchlist {
            symbols: self.entries.lock().unwrap().clone(),
            updated_at: Some("2025-03-14T15:30:00".to_string()),
        }
    }
}

pub fn summary_payload(as_of: &str, spx_pct: f64) -> Value {
    json!({
        "as_of": as_of,
        "sources": {"indices": "YahooFinance", "vix": "YahooFinance", "sectors": "YahooFinance"},
        "indices": [
            {"symbol": "^GSPC", "price": 5612.4, "pct": spx_pct},
            {"symbol": "^IXIC", "price": 17750.2, "pct": -0.18}
        ],
        "vix": {"symbol": "^VIX", "price": 14.8, "pct": -2.5},
        "sectors": [
            {"symbol": "XLK", "name": "Info Tech", "pct": 1.1},
            {"symbol": "XLE", "name": "Energy", "pct": -0.7}
        ],
        "session_posture": {
            "score": 34.0,
            "label": "Risk-On",
            "components": {"breadth": 20.0, "dispersion": 50.0, "vol_overlay": 50.0},
            "notes": ["Breadth: 20.0/100 (40% weight)", "Sector Dispersion: 50.0/100 (40% weight)"]
        }
    })
}

#[async_trait]
impl MarketBackend for FakeBackend {
    async fn health(&self) -> Result<HealthStatus, FetchError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            timestamp: "2025-03-14T15:30:00".to_string(),
            sources: [("YahooFinance".to_string(), true), ("SEC".to_string(), false)]
                .into_iter()
                .collect(),
        })
    }

    async fn summary(&self) -> Result<Value, FetchError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.summary_started.lock().unwrap().push(Instant::now());
        let delay = self.summary_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failing_summaries.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_summaries.store(failing - 1, Ordering::SeqCst);
            return Err(FetchError::HttpStatus {
                status: 500,
                url: "http://fake/api/summary".to_string(),
            });
        }
        Ok(self.summary.lock().unwrap().clone())
    }

    async fn watchlist(&self) -> Result<Watchlist, FetchError> {
        Ok(self.snapshot())
    }

    async fn add_to_watchlist(&self, entries: &[WatchlistEntry]) -> Result<Watchlist, FetchError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut stored = self.entries.lock().unwrap();
            for entry in entries {
                match stored.iter_mut().find(|e| e.symbol == entry.symbol) {
                    Some(existing) => existing.notes = entry.notes.clone(),
                    None => stored.push(entry.clone()),
                }
            }
        }
        Ok(self.snapshot())
    }

    async fn remove_from_watchlist(&self, symbol: &str) -> Result<Watchlist, FetchError> {
        {
            let mut stored = self.entries.lock().unwrap();
            let before = stored.len();
            stored.retain(|e| e.symbol != symbol);
            if self.strict_delete && stored.len() == before {
                return Err(FetchError::HttpStatus {
                    status: 404,
                    url: format!("http://fake/api/watchlist/{}", symbol),
                });
            }
        }
        Ok(self.snapshot())
    }

    async fn mini_quotes(&self, symbols: &[String]) -> Result<Value, FetchError> {
        self.mini_quote_calls.fetch_add(1, Ordering::SeqCst);
        let series = self.series.lock().unwrap();
        Ok(Value::Array(
            symbols
                .iter()
                .map(|s| {
                    let values = series.get(s).cloned().unwrap_or_default();
                    let pct = match (values.first(), values.last()) {
                        (Some(first), Some(last)) if *first != 0.0 => (last - first) / first * 100.0,
                        _ => 0.0,
                    };
                    json!({"symbol": s, "pct": pct, "sparkline": values})
                })
                .collect(),
        ))
    }
}
