/// Market Dashboard - Shared Library
///
/// Core of the `market-dashboard` terminal client:
/// - Typed quote/posture/watchlist records and tolerant normalization
/// - Sparkline geometry for watchlist trends
/// - HTTP backend client and watchlist store
/// - Summary poller with per-cycle error isolation
/// - Pure region renderer plus terminal and plain-text presenters
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::types::{
    BreadthData, HealthStatus, MacroEvent, MiniQuote, Mover, Polarity, Posture, Quote,
    SecHeadline, SectorQuote, Summary, Watchlist, WatchlistEntry, format_pct,
};

pub use shared::backend::{BackendConfig, HttpBackend, MarketBackend};
pub use shared::config::DashboardConfig;
pub use shared::error::{ConfigError, FetchError};
pub use shared::normalize::{normalize, normalize_body, normalize_mini_quotes};
pub use shared::poller::{DashboardPoller, PollOutcome, PollState, PollerConfig, spawn_poller};
pub use shared::render::{
    DisplayLimits, Presenter, Region, RenderOptions, TextPresenter, region_lines, render_view,
};
pub use shared::sparkline::{PathCommand, Point, Sparkline, sparkline_path, sparkline_path_sized};
pub use shared::view::{PanelStatus, SummaryPanel, ViewState, WatchlistPanel, WatchlistSnapshot};
pub use shared::watchlist::{
    WatchlistAction, WatchlistStore, apply_action, normalize_symbol, spawn_watchlist_worker,
};
