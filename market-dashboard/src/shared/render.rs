//! View rendering
//!
//! Pure mapping from [`ViewState`] to styled lines per screen region. No I/O
//! happens here; a [`Presenter`] decides where the lines end up (terminal
//! frame, plain text).

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use super::sparkline::sparkline_path;
use super::types::{BreadthData, Polarity, Posture, Quote, Summary, UNKNOWN_SYMBOL, format_pct};
use super::view::{PanelStatus, SummaryPanel, ViewState, WatchlistPanel};

const C_UP: Color = Color::Rgb(100, 220, 100);
const C_DOWN: Color = Color::Rgb(220, 100, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_HEADER: Color = Color::Rgb(180, 130, 220);

/// Most recent values drawn per watchlist sparkline
pub const SPARK_POINTS: usize = 24;

/// Rows shown per movers group
pub const MOVERS_PER_GROUP: usize = 5;

/// Screen regions; all but the last belong to the poller, the last to the
/// watchlist worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Status,
    Indices,
    Breadth,
    Sectors,
    Movers,
    Posture,
    Headlines,
    Sources,
    Watchlist,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::Status,
        Region::Indices,
        Region::Breadth,
        Region::Sectors,
        Region::Movers,
        Region::Posture,
        Region::Headlines,
        Region::Sources,
        Region::Watchlist,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Region::Status => " STATUS ",
            Region::Indices => " INDICES ",
            Region::Breadth => " BREADTH ",
            Region::Sectors => " SECTORS ",
            Region::Movers => " MOVERS ",
            Region::Posture => " SESSION POSTURE ",
            Region::Headlines => " MACRO & FILINGS ",
            Region::Sources => " SOURCES ",
            Region::Watchlist => " WATCHLIST ",
        }
    }
}

/// Display-layer truncation; `None` shows everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayLimits {
    pub indices: Option<usize>,
    pub sectors: Option<usize>,
}

/// Options that are not part of the data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub limits: DisplayLimits,
    /// Highlighted watchlist row
    pub selected: Option<usize>,
}

/// A presentation target: receives the lines for one region at a time.
pub trait Presenter {
    fn render(&mut self, region: Region, lines: Vec<Line<'static>>);
}

/// Render every region of `view` into `presenter`.
pub fn render_view<P: Presenter>(presenter: &mut P, view: &ViewState, options: &RenderOptions) {
    for region in Region::ALL {
        presenter.render(region, region_lines(region, view, options));
    }
}

/// Lines for a single region.
pub fn region_lines(region: Region, view: &ViewState, options: &RenderOptions) -> Vec<Line<'static>> {
    let summary = view.summary.last.as_ref();
    match region {
        Region::Status => vec![status_line(&view.summary)],
        Region::Indices => match summary {
            Some(s) => index_lines(s, options.limits.indices),
            None => vec![placeholder("Waiting for summary...")],
        },
        Region::Breadth => summary.map(breadth_lines).unwrap_or_default(),
        Region::Sectors => match summary {
            Some(s) => sector_lines(s, options.limits.sectors),
            None => vec![placeholder("Waiting for summary...")],
        },
        Region::Movers => summary.map(mover_lines).unwrap_or_default(),
        Region::Headlines => summary.map(headline_lines).unwrap_or_default(),
        Region::Posture => match summary {
            Some(s) => posture_lines(&s.session_posture),
            None => vec![placeholder("Waiting for summary...")],
        },
        Region::Sources => match summary {
            Some(s) => source_lines(s),
            None => Vec::new(),
        },
        Region::Watchlist => watchlist_lines(&view.watchlist, options.selected),
    }
}

fn polarity_color(polarity: Polarity) -> Color {
    match polarity {
        Polarity::Positive => C_UP,
        Polarity::Negative => C_DOWN,
    }
}

fn placeholder(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(C_DIM)))
}

fn as_of_label(summary: &Summary) -> String {
    match summary.as_of_time() {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None if summary.as_of.is_empty() => UNKNOWN_SYMBOL.to_string(),
        None => summary.as_of.clone(),
    }
}

/// Backend status indicator plus snapshot time.
pub fn status_line(panel: &SummaryPanel) -> Line<'static> {
    let mut spans = match &panel.status {
        PanelStatus::Loading => vec![Span::styled(
            "Loading...",
            Style::default().fg(C_DIM),
        )],
        PanelStatus::Ok { latency_ms, .. } => {
            let latency = latency_ms.map(|ms| format!(" ({} ms)", ms)).unwrap_or_default();
            vec![
                Span::styled(
                    "Backend OK",
                    Style::default().fg(C_UP).add_modifier(Modifier::BOLD),
                ),
                Span::styled(latency, Style::default().fg(C_DIM)),
            ]
        }
        PanelStatus::Error { at, message } => vec![
            Span::styled(
                "Backend ERROR: ",
                Style::default().fg(C_DOWN).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.clone(), Style::default().fg(C_DOWN)),
            Span::styled(
                format!(" at {}", at.format("%H:%M:%S")),
                Style::default().fg(C_DIM),
            ),
        ],
    };

    if let Some(summary) = &panel.last {
        let prefix = if panel.status.is_error() {
            "  showing as of "
        } else {
            "  as of "
        };
        spans.push(Span::styled(prefix, Style::default().fg(C_DIM)));
        spans.push(Span::styled(as_of_label(summary), Style::default().fg(C_BRIGHT)));
    }

    if let Some(health) = &panel.health {
        spans.push(Span::styled(
            format!(
                "  [{}/{} sources up]",
                health.sources_up(),
                health.sources.len()
            ),
            Style::default().fg(C_ACCENT),
        ));
    }

    Line::from(spans)
}

fn quote_chip(label: &str, quote: &Quote, polarity: Polarity) -> Line<'static> {
    let color = polarity_color(polarity);
    Line::from(vec![
        Span::styled(
            format!("{:<8}", label),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{:>12.2}", quote.price), Style::default().fg(C_BRIGHT)),
        Span::styled(format!("  {}", format_pct(quote.pct)), Style::default().fg(color)),
    ])
}

/// Index chips followed by the VIX chip (inverted polarity).
pub fn index_lines(summary: &Summary, limit: Option<usize>) -> Vec<Line<'static>> {
    let take = limit.unwrap_or(usize::MAX);
    let mut lines: Vec<Line<'static>> = summary
        .indices
        .iter()
        .take(take)
        .map(|q| quote_chip(&q.symbol, q, q.polarity()))
        .collect();

    if lines.is_empty() {
        lines.push(placeholder("none"));
    }

    lines.push(quote_chip("VIX", &summary.vix, summary.vix_polarity()));
    lines
}

/// One line per sector, in backend order.
pub fn sector_lines(summary: &Summary, limit: Option<usize>) -> Vec<Line<'static>> {
    let take = limit.unwrap_or(usize::MAX);
    let lines: Vec<Line<'static>> = summary
        .sectors
        .iter()
        .take(take)
        .map(|s| {
            Line::from(vec![
                Span::styled(
                    format!("{:<6}", s.quote.symbol),
                    Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{:<18}", s.name), Style::default().fg(C_DIM)),
                Span::styled(
                    format_pct(s.quote.pct),
                    Style::default().fg(polarity_color(s.polarity())),
                ),
            ])
        })
        .collect();

    if lines.is_empty() {
        vec![placeholder("none")]
    } else {
        lines
    }
}

/// Compact volume: `1.25B`, `52.0M`, `950K`, or the plain count.
pub fn format_volume(vol: u64) -> String {
    let v = vol as f64;
    if v >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{:.0}K", v / 1e3)
    } else {
        vol.to_string()
    }
}

fn count_text(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "--".to_string())
}

fn breadth_line(exchange: &str, data: &BreadthData) -> Line<'static> {
    let color = match data.net_advancers() {
        Some(net) => polarity_color(Polarity::of(net as f64)),
        None => C_DIM,
    };
    let vol = |v: Option<u64>| v.map(format_volume).unwrap_or_else(|| "--".to_string());

    Line::from(vec![
        Span::styled(
            format!("{:<8}", exchange.to_uppercase()),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "A/D {}/{}",
                count_text(data.advancers),
                count_text(data.decliners)
            ),
            Style::default().fg(color),
        ),
        Span::styled(
            format!("  vol {}/{}", vol(data.up_vol), vol(data.down_vol)),
            Style::default().fg(C_DIM),
        ),
    ])
}

/// Advance/decline per exchange; unknown counts render as `--`.
pub fn breadth_lines(summary: &Summary) -> Vec<Line<'static>> {
    if summary.breadth.is_empty() {
        return vec![placeholder("none")];
    }
    summary
        .breadth
        .iter()
        .map(|(exchange, data)| breadth_line(exchange, data))
        .collect()
}

/// Each movers group in backend order, top rows only.
pub fn mover_lines(summary: &Summary) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (group, movers) in summary.movers.iter().filter(|(_, m)| !m.is_empty()) {
        lines.push(Line::from(Span::styled(
            group.replace('_', " "),
            Style::default().fg(C_HEADER).add_modifier(Modifier::BOLD),
        )));
        lines.extend(movers.iter().take(MOVERS_PER_GROUP).map(|m| {
            Line::from(vec![
                Span::styled(format!("  {:<8}", m.symbol), Style::default().fg(C_BRIGHT)),
                Span::styled(format!("{:>10.2}", m.price), Style::default().fg(C_BRIGHT)),
                Span::styled(
                    format!("{:>9}", format_pct(m.pct)),
                    Style::default().fg(polarity_color(m.polarity())),
                ),
                Span::styled(format!("  {}", format_volume(m.vol)), Style::default().fg(C_DIM)),
            ])
        }));
    }

    if lines.is_empty() {
        lines.push(placeholder("none"));
    }
    lines
}

/// Macro calendar first, then filing headlines.
pub fn headline_lines(summary: &Summary) -> Vec<Line<'static>> {
    let macro_rows = summary.macro_events.iter().map(|event| {
        Line::from(vec![
            Span::styled(format!("{:<6}", event.time), Style::default().fg(C_ACCENT)),
            Span::styled(format!(" {}", event.label), Style::default().fg(C_BRIGHT)),
        ])
    });
    let filing_rows = summary.sec_headlines.iter().map(|headline| {
        Line::from(vec![
            Span::styled(format!("{:<6}", headline.time), Style::default().fg(C_DIM)),
            Span::styled(format!(" {}", headline.title), Style::default().fg(C_BRIGHT)),
        ])
    });

    let lines: Vec<Line<'static>> = macro_rows.chain(filing_rows).collect();
    if lines.is_empty() {
        vec![placeholder("none")]
    } else {
        lines
    }
}

/// Label and score, notes in order, then components.
pub fn posture_lines(posture: &Posture) -> Vec<Line<'static>> {
    let color = if posture.score > 0.0 {
        C_UP
    } else if posture.score < 0.0 {
        C_DOWN
    } else {
        C_HEADER
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            posture.label.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({:.1})", posture.score), Style::default().fg(C_BRIGHT)),
    ])];

    lines.extend(posture.notes.iter().map(|note| {
        Line::from(Span::styled(format!("- {}", note), Style::default().fg(C_DIM)))
    }));

    if !posture.components.is_empty() {
        lines.push(Line::from(
            posture
                .components
                .iter()
                .map(|(name, value)| {
                    Span::styled(format!("{} {:+.1}  ", name, value), Style::default().fg(C_ACCENT))
                })
                .collect::<Vec<_>>(),
        ));
    }

    lines
}

/// Provenance per section, with upstream delay when known.
pub fn source_lines(summary: &Summary) -> Vec<Line<'static>> {
    summary
        .sources
        .iter()
        .map(|(section, source)| {
            let delay = summary
                .latency_min
                .get(section)
                .filter(|m| **m > 0)
                .map(|m| format!(" ({}m delayed)", m))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("{:<10}", section), Style::default().fg(C_DIM)),
                Span::styled(source.clone(), Style::default().fg(C_BRIGHT)),
                Span::styled(delay, Style::default().fg(C_DIM)),
            ])
        })
        .collect()
}

/// Watchlist rows with sparkline glyphs, or the empty placeholder.
pub fn watchlist_lines(panel: &WatchlistPanel, selected: Option<usize>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match &panel.status {
        PanelStatus::Error { message, .. } => lines.push(Line::from(Span::styled(
            format!("Watchlist ERROR: {}", message),
            Style::default().fg(C_DOWN).add_modifier(Modifier::BOLD),
        ))),
        PanelStatus::Loading => {
            lines.push(placeholder("Loading watchlist..."));
            return lines;
        }
        PanelStatus::Ok { .. } => {}
    }

    if panel.snapshot.is_empty() {
        lines.push(placeholder("No symbols yet."));
        return lines;
    }

    for (i, row) in panel.snapshot.rows().into_iter().enumerate() {
        let marker = if selected == Some(i) { "> " } else { "  " };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(C_ACCENT)),
            Span::styled(
                format!("{:<8}", row.entry.symbol),
                Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
            ),
        ];

        match &row.quote {
            Some(quote) => {
                let color = polarity_color(quote.polarity());
                let start = quote.sparkline.len().saturating_sub(SPARK_POINTS);
                let glyphs = sparkline_path(&quote.sparkline[start..]).glyphs();
                spans.push(Span::styled(
                    format!("{:>8}", format_pct(quote.pct)),
                    Style::default().fg(color),
                ));
                spans.push(Span::styled(
                    format!("  {:<width$}", glyphs, width = SPARK_POINTS),
                    Style::default().fg(color),
                ));
            }
            None => {
                spans.push(Span::styled(format!("{:>8}", "--"), Style::default().fg(C_DIM)));
                spans.push(Span::raw(format!("  {:<width$}", "", width = SPARK_POINTS)));
            }
        }

        if !row.entry.notes().is_empty() {
            spans.push(Span::styled(
                format!("  {}", row.entry.notes()),
                Style::default().fg(C_DIM),
            ));
        }

        let line = Line::from(spans);
        lines.push(if selected == Some(i) {
            line.style(Style::default().add_modifier(Modifier::REVERSED))
        } else {
            line
        });
    }

    lines
}

/// Flatten a styled line to its text.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// Plain-text target, used for headless output
#[derive(Debug, Default)]
pub struct TextPresenter {
    out: String,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl Presenter for TextPresenter {
    fn render(&mut self, region: Region, lines: Vec<Line<'static>>) {
        if lines.is_empty() {
            return;
        }
        self.out.push_str(&format!("=={}==\n", region.title()));
        for line in &lines {
            self.out.push_str(line_text(line).trim_end());
            self.out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::FetchError;
    use crate::shared::normalize::normalize;
    use crate::shared::test_support::summary_payload;
    use crate::shared::types::{MiniQuote, Watchlist, WatchlistEntry};
    use crate::shared::view::WatchlistSnapshot;
    use std::time::Duration;

    fn loaded_view() -> ViewState {
        let mut view = ViewState::default();
        view.summary.succeeded(
            normalize(&summary_payload("2025-03-14T15:30:00", 0.42)).unwrap(),
            Duration::from_millis(12),
        );
        view
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    #[test]
    fn test_status_line_states() {
        let mut panel = SummaryPanel::default();
        assert_eq!(line_text(&status_line(&panel)), "Loading...");

        panel.succeeded(
            normalize(&summary_payload("2025-03-14T15:30:00", 0.1)).unwrap(),
            Duration::from_millis(12),
        );
        let ok = line_text(&status_line(&panel));
        assert!(ok.starts_with("Backend OK (12 ms)"));
        assert!(ok.contains("as of 2025-03-14 15:30:00 UTC"));

        panel.failed(&FetchError::HttpStatus {
            status: 500,
            url: "http://x/api/summary".into(),
        });
        let err = line_text(&status_line(&panel));
        assert!(err.starts_with("Backend ERROR: HTTP 500 from http://x/api/summary"));
        assert!(err.contains("showing as of 2025-03-14 15:30:00 UTC"));
    }

    #[test]
    fn test_index_lines_with_vix() {
        let view = loaded_view();
        let summary = view.summary.last.as_ref().unwrap();
        let lines = texts(&index_lines(summary, None));

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("^GSPC"));
        assert!(lines[0].ends_with("+0.42%"));
        assert!(lines[1].ends_with("-0.18%"));
        assert!(lines[2].starts_with("VIX"));
        assert!(lines[2].ends_with("-2.50%"));

        // VIX falling renders in the "up" color
        let vix = index_lines(summary, None).pop().unwrap();
        assert_eq!(vix.spans[2].style.fg, Some(C_UP));
    }

    #[test]
    fn test_limits_are_display_only() {
        let view = loaded_view();
        let summary = view.summary.last.as_ref().unwrap();

        assert_eq!(index_lines(summary, Some(1)).len(), 2);
        assert_eq!(sector_lines(summary, Some(1)).len(), 1);
        assert_eq!(summary.sectors.len(), 2);
    }

    #[test]
    fn test_posture_notes_in_order() {
        let view = loaded_view();
        let posture = &view.summary.last.as_ref().unwrap().session_posture;
        let lines = texts(&posture_lines(posture));

        assert_eq!(lines[0], "Risk-On (34.0)");
        assert_eq!(lines[1], "- Breadth: 20.0/100 (40% weight)");
        assert_eq!(lines[2], "- Sector Dispersion: 50.0/100 (40% weight)");
        assert!(lines[3].contains("breadth +20.0"));
    }

    #[test]
    fn test_format_volume() {
        struct TestCase {
            input: u64,
            expected: &'static str,
        }

        let tests = vec![
            // TC0: billions
            TestCase { input: 1_250_000_000, expected: "1.25B" },
            // TC1: millions
            TestCase { input: 52_000_000, expected: "52.0M" },
            // TC2: thousands
            TestCase { input: 950_000, expected: "950K" },
            // TC3: small
            TestCase { input: 42, expected: "42" },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(format_volume(test.input), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_breadth_movers_and_headlines() {
        let mut payload = summary_payload("2025-03-14T15:30:00", 0.42);
        payload["breadth"] = serde_json::json!({
            "nyse": {"advancers": 1850, "decliners": 1200, "upVol": 900000000, "downVol": 600000000},
            "nasdaq": {}
        });
        payload["movers"] = serde_json::json!({
            "gainers": [{"symbol": "SMCI", "price": 41.2, "pct": 12.5, "vol": 52000000}],
            "losers": [],
            "most_active": [{"symbol": "NVDA", "price": 120.0, "pct": -1.0, "vol": 310000000}]
        });
        payload["macro"] = serde_json::json!([{"time": "08:30", "label": "CPI m/m"}]);
        payload["sec_headlines"] = serde_json::json!([
            {"time": "09:12", "title": "8-K: NVIDIA Corp", "url": "https://www.sec.gov/x"}
        ]);
        let summary = normalize(&payload).unwrap();

        let breadth = texts(&breadth_lines(&summary));
        assert_eq!(breadth[0], "NYSE    A/D 1850/1200  vol 900.0M/600.0M");
        assert_eq!(breadth[1], "NASDAQ  A/D --/--  vol --/--");

        let movers = texts(&mover_lines(&summary));
        assert_eq!(movers.len(), 4);
        assert_eq!(movers[0], "gainers");
        assert!(movers[1].contains("SMCI"));
        assert!(movers[1].ends_with("+12.50%  52.0M"));
        assert_eq!(movers[2], "most active");

        let headlines = texts(&headline_lines(&summary));
        assert_eq!(headlines, vec!["08:30  CPI m/m", "09:12  8-K: NVIDIA Corp"]);

        let empty = normalize(&summary_payload("t", 0.0)).unwrap();
        assert_eq!(texts(&breadth_lines(&empty)), vec!["none"]);
        assert_eq!(texts(&mover_lines(&empty)), vec!["none"]);
        assert_eq!(texts(&headline_lines(&empty)), vec!["none"]);
    }

    #[test]
    fn test_empty_watchlist_placeholder() {
        let panel = WatchlistPanel::loaded(WatchlistSnapshot::default());
        assert_eq!(texts(&watchlist_lines(&panel, None)), vec!["No symbols yet."]);
    }

    #[test]
    fn test_watchlist_error_shows_empty_state() {
        let panel = WatchlistPanel::failed(&FetchError::Network("refused".into()));
        let lines = texts(&watchlist_lines(&panel, None));
        assert_eq!(lines[0], "Watchlist ERROR: network error: refused");
        assert_eq!(lines[1], "No symbols yet.");
    }

    #[test]
    fn test_watchlist_rows() {
        let snapshot = WatchlistSnapshot {
            watchlist: Watchlist {
                symbols: vec![
                    WatchlistEntry::new("AAPL", "core"),
                    WatchlistEntry::new("TSLA", ""),
                ],
                updated_at: None,
            },
            quotes: vec![MiniQuote {
                symbol: "AAPL".into(),
                pct: 1.3,
                sparkline: vec![1.0, 2.0, 3.0],
                price: None,
                volume: None,
            }],
        };
        let panel = WatchlistPanel::loaded(snapshot);
        let lines = watchlist_lines(&panel, Some(1));
        let text = texts(&lines);

        assert!(text[0].starts_with("  AAPL"));
        assert!(text[0].contains("+1.30%"));
        assert!(text[0].contains("▁▅█"));
        assert!(text[0].ends_with("core"));
        assert!(text[1].starts_with("> TSLA"));
        assert!(text[1].contains("--"));
    }

    #[test]
    fn test_text_presenter() {
        let view = loaded_view();
        let mut presenter = TextPresenter::new();
        render_view(&mut presenter, &view, &RenderOptions::default());
        let out = presenter.into_string();

        assert!(out.contains("== STATUS =="));
        assert!(out.contains("== SESSION POSTURE ==\nRisk-On (34.0)"));
        assert!(out.contains("== SOURCES ==\nindices   YahooFinance"));
        assert!(out.contains("== BREADTH ==\nnone"));
        assert!(out.contains("== WATCHLIST ==\nLoading watchlist..."));
    }

    #[test]
    fn test_waiting_placeholders() {
        let view = ViewState::default();
        let lines = region_lines(Region::Indices, &view, &RenderOptions::default());
        assert_eq!(texts(&lines), vec!["Waiting for summary..."]);
        assert!(region_lines(Region::Sources, &view, &RenderOptions::default()).is_empty());
        assert!(region_lines(Region::Movers, &view, &RenderOptions::default()).is_empty());
    }
}
