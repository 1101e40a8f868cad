/// Core display records for the dashboard
///
/// These mirror the JSON shapes served by the market backend at
/// `/api/summary`, `/api/watchlist`, `/api/miniquotes` and `/api/health`.
/// Summary and mini quotes are built by the normalizer (tolerant of missing
/// fields); watchlist and health payloads deserialize directly.
use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder shown for a quote that arrived without a symbol
pub const UNKNOWN_SYMBOL: &str = "(?)";

/// Label used when the backend sends no session posture
pub const NEUTRAL_POSTURE: &str = "Neutral";

/// Display polarity of a signed change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Non-negative values are positive; `-0.0` counts as non-negative.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    /// Convert to display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Polarity::Positive)
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format a percentage change: two decimals, explicit `+` for values >= 0,
/// trailing `%`.
pub fn format_pct(pct: f64) -> String {
    if pct >= 0.0 {
        // abs() folds -0.0 into 0.0 so it never prints as "+-0.00%"
        format!("+{:.2}%", pct.abs())
    } else {
        format!("{:.2}%", pct)
    }
}

/// A single instrument quote
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Quote {
    pub symbol: String,
    /// Last price, never negative after normalization
    pub price: f64,
    /// Signed percentage change
    pub pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: f64, pct: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            pct,
            high: None,
            low: None,
            volume: None,
        }
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.pct)
    }
}

/// Sector ETF quote with its human-readable label
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectorQuote {
    pub quote: Quote,
    pub name: String,
}

impl SectorQuote {
    pub fn polarity(&self) -> Polarity {
        self.quote.polarity()
    }
}

/// Session posture assessment
///
/// `notes` order is display order; `components` order is whatever the
/// backend sent and carries no meaning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Posture {
    pub label: String,
    pub score: f64,
    pub notes: Vec<String>,
    pub components: IndexMap<String, f64>,
}

impl Default for Posture {
    fn default() -> Self {
        Self {
            label: NEUTRAL_POSTURE.to_string(),
            score: 0.0,
            notes: Vec::new(),
            components: IndexMap::new(),
        }
    }
}

/// Advance/decline counts for one exchange; unknown counts stay `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BreadthData {
    pub advancers: Option<u64>,
    pub decliners: Option<u64>,
    #[serde(rename = "upVol")]
    pub up_vol: Option<u64>,
    #[serde(rename = "downVol")]
    pub down_vol: Option<u64>,
}

impl BreadthData {
    /// Advancers minus decliners, when both are known
    pub fn net_advancers(&self) -> Option<i64> {
        Some(self.advancers? as i64 - self.decliners? as i64)
    }

    pub fn is_empty(&self) -> bool {
        self.advancers.is_none()
            && self.decliners.is_none()
            && self.up_vol.is_none()
            && self.down_vol.is_none()
    }
}

/// Top mover row (gainers, losers, most active)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Mover {
    pub symbol: String,
    pub price: f64,
    pub pct: f64,
    pub vol: u64,
}

impl Mover {
    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.pct)
    }
}

/// Scheduled macro release (CPI, FOMC, ...)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MacroEvent {
    pub time: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Regulatory filing headline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecHeadline {
    pub time: String,
    pub title: String,
    pub url: String,
}

/// One polling cycle's market snapshot
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    pub as_of: String,
    pub indices: Vec<Quote>,
    pub vix: Quote,
    /// Per exchange, e.g. `nyse`, `nasdaq`
    pub breadth: IndexMap<String, BreadthData>,
    pub sectors: Vec<SectorQuote>,
    /// Per group, e.g. `gainers`, `losers`, `most_active`
    pub movers: IndexMap<String, Vec<Mover>>,
    #[serde(rename = "macro")]
    pub macro_events: Vec<MacroEvent>,
    pub sec_headlines: Vec<SecHeadline>,
    pub session_posture: Posture,
    /// Provenance labels per section, passed through untouched
    pub sources: IndexMap<String, String>,
    /// Upstream delay per section in minutes
    pub latency_min: IndexMap<String, i64>,
    pub notes: Vec<String>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            as_of: String::new(),
            indices: Vec::new(),
            vix: Quote::new(UNKNOWN_SYMBOL, 0.0, 0.0),
            breadth: IndexMap::new(),
            sectors: Vec::new(),
            movers: IndexMap::new(),
            macro_events: Vec::new(),
            sec_headlines: Vec::new(),
            session_posture: Posture::default(),
            sources: IndexMap::new(),
            latency_min: IndexMap::new(),
            notes: Vec::new(),
        }
    }
}

impl Summary {
    /// VIX polarity is inverted: a falling VIX is a positive signal.
    pub fn vix_polarity(&self) -> Polarity {
        Polarity::of(-self.vix.pct)
    }

    /// Parse `as_of` as RFC 3339, or as a naive ISO timestamp assumed UTC.
    pub fn as_of_time(&self) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.as_of) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.as_of, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Watchlist row; identity is the upper-cased symbol
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

impl WatchlistEntry {
    pub fn new(symbol: impl Into<String>, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        Self {
            symbol: symbol.into(),
            notes: (!notes.is_empty()).then_some(notes),
            added_at: None,
        }
    }

    /// Notes, empty when the backend sent none
    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

/// Watchlist as returned by every watchlist endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Watchlist {
    #[serde(default)]
    pub symbols: Vec<WatchlistEntry>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Watchlist {
    /// Symbols in backend order
    pub fn symbols(&self) -> Vec<String> {
        self.symbols.iter().map(|e| e.symbol.clone()).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols
            .iter()
            .any(|e| e.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn get(&self, symbol: &str) -> Option<&WatchlistEntry> {
        self.symbols
            .iter()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Compact per-symbol record for watchlist rows
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MiniQuote {
    pub symbol: String,
    pub pct: f64,
    /// Chronologically ordered values, possibly empty
    pub sparkline: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl MiniQuote {
    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.pct)
    }
}

/// Backend health report from `/api/health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub sources: IndexMap<String, bool>,
}

impl HealthStatus {
    /// Number of upstream feeds reported as up
    pub fn sources_up(&self) -> usize {
        self.sources.values().filter(|up| **up).count()
    }

    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
