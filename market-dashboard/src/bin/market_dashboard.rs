/// Market Dashboard TUI
///
/// Polls the market backend for the session summary (indices, VIX, breadth,
/// sectors, movers, posture, macro calendar and filings) and keeps a
/// watchlist with sparklines.
///
/// Keys: q/Esc quit, r refresh summary, w refresh watchlist, a add symbol
/// (Tab switches to notes, Enter submits, Esc cancels), Up/Down select,
/// d remove selected.
///
/// `--once` runs one cycle, prints a plain-text rendering and exits.
use std::{
    error::Error,
    fs::OpenOptions,
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use market_dashboard::{
    DashboardConfig, DashboardPoller, HttpBackend, PollOutcome, Presenter, Region, RenderOptions,
    SummaryPanel, TextPresenter, ViewState, WatchlistAction, WatchlistEntry, WatchlistPanel,
    WatchlistStore, apply_action, render_view, spawn_poller, spawn_watchlist_worker,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_ALERT: Color = Color::Rgb(220, 100, 100);

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env()?;
    let once = std::env::args().skip(1).any(|arg| arg == "--once");

    if once {
        init_logging(None)?;
        return run_once(config).await;
    }

    init_logging(Some(&config))?;
    run_tui(config).await
}

/// Initialize logging: to the configured file while the TUI owns the
/// terminal, to stderr otherwise
fn init_logging(config: Option<&DashboardConfig>) -> Result<(), Box<dyn Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match config {
        Some(config) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

/// One summary cycle and one watchlist refresh, printed as text.
async fn run_once(config: DashboardConfig) -> Result<(), Box<dyn Error>> {
    let backend = Arc::new(HttpBackend::new(config.backend.clone())?);
    let (summary_tx, summary_rx) = watch::channel(SummaryPanel::default());
    let mut poller = DashboardPoller::new(Arc::clone(&backend), config.poller.clone(), summary_tx);
    let store = WatchlistStore::new(backend);

    poller.check_health().await;
    let (outcome, watchlist) = futures::join!(
        poller.poll_once(),
        apply_action(&store, WatchlistAction::Refresh)
    );

    let view = ViewState {
        summary: summary_rx.borrow().clone(),
        watchlist,
    };
    let mut presenter = TextPresenter::new();
    render_view(
        &mut presenter,
        &view,
        &RenderOptions {
            limits: config.limits,
            selected: None,
        },
    );
    print!("{}", presenter.as_str());

    match outcome {
        PollOutcome::Failed(e) => Err(e.into()),
        PollOutcome::Rendered { .. } => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Symbol,
    Notes,
}

/// Local UI state; nothing here is market data
struct App {
    mode: InputMode,
    symbol: String,
    notes: String,
    selected: usize,
}

impl App {
    fn new() -> Self {
        Self {
            mode: InputMode::Normal,
            symbol: String::new(),
            notes: String::new(),
            selected: 0,
        }
    }

    fn reset_input(&mut self) {
        self.mode = InputMode::Normal;
        self.symbol.clear();
        self.notes.clear();
    }
}

async fn run_tui(config: DashboardConfig) -> Result<(), Box<dyn Error>> {
    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    info!(
        "Starting market dashboard against {} (poll every {:?})",
        config.backend.base_url, config.poller.interval
    );

    let backend = Arc::new(HttpBackend::new(config.backend.clone())?);

    let (summary_tx, summary_rx) = watch::channel(SummaryPanel::default());
    let poller = DashboardPoller::new(Arc::clone(&backend), config.poller.clone(), summary_tx);
    let (refresh_tx, poller_handle) = spawn_poller(poller);

    let (watchlist_tx, watchlist_rx) = watch::channel(WatchlistPanel::default());
    let (action_tx, action_rx) = mpsc::channel(16);
    let worker_handle =
        spawn_watchlist_worker(WatchlistStore::new(backend), action_rx, watchlist_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    loop {
        let view = ViewState {
            summary: summary_rx.borrow().clone(),
            watchlist: watchlist_rx.borrow().clone(),
        };
        let row_count = view.watchlist.snapshot.watchlist.len();
        app.selected = app.selected.min(row_count.saturating_sub(1));

        let options = RenderOptions {
            limits: config.limits,
            selected: (row_count > 0).then_some(app.selected),
        };
        terminal.draw(|f| draw(f, &view, &options, &app))?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('r') => {
                    // A full channel means a refresh is already pending
                    let _ = refresh_tx.try_send(());
                }
                KeyCode::Char('w') => send_action(&action_tx, WatchlistAction::Refresh),
                KeyCode::Char('a') => app.mode = InputMode::Symbol,
                KeyCode::Up => app.selected = app.selected.saturating_sub(1),
                KeyCode::Down => {
                    if app.selected + 1 < row_count {
                        app.selected += 1;
                    }
                }
                KeyCode::Char('d') => {
                    if let Some(entry) = view.watchlist.snapshot.watchlist.symbols.get(app.selected) {
                        send_action(&action_tx, WatchlistAction::Remove(entry.symbol.clone()));
                    }
                }
                _ => {}
            },
            InputMode::Symbol | InputMode::Notes => match key.code {
                KeyCode::Esc => app.reset_input(),
                KeyCode::Tab => {
                    app.mode = if app.mode == InputMode::Symbol {
                        InputMode::Notes
                    } else {
                        InputMode::Symbol
                    };
                }
                KeyCode::Enter => {
                    let symbol = app.symbol.trim().to_uppercase();
                    if !symbol.is_empty() {
                        let entry = WatchlistEntry::new(symbol, app.notes.trim());
                        send_action(&action_tx, WatchlistAction::Add(vec![entry]));
                    }
                    app.reset_input();
                }
                KeyCode::Backspace => {
                    if app.mode == InputMode::Symbol {
                        app.symbol.pop();
                    } else {
                        app.notes.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if app.mode == InputMode::Symbol {
                        if !c.is_whitespace() {
                            app.symbol.push(c.to_ascii_uppercase());
                        }
                    } else {
                        app.notes.push(c);
                    }
                }
                _ => {}
            },
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    drop(refresh_tx);
    drop(action_tx);
    let _ = poller_handle.await;
    let _ = worker_handle.await;
    info!("Market dashboard stopped");
    Ok(())
}

fn send_action(action_tx: &mpsc::Sender<WatchlistAction>, action: WatchlistAction) {
    if let Err(e) = action_tx.try_send(action) {
        warn!("Dropped watchlist action: {}", e);
    }
}

/// Screen areas per region
struct RegionAreas {
    status: Rect,
    indices: Rect,
    breadth: Rect,
    sectors: Rect,
    movers: Rect,
    posture: Rect,
    headlines: Rect,
    sources: Rect,
    watchlist: Rect,
    input: Rect,
}

impl RegionAreas {
    fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(32),
                Constraint::Percentage(34),
                Constraint::Percentage(34),
            ])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(20),
                Constraint::Percentage(50),
            ])
            .split(columns[0]);

        let middle = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(columns[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(columns[2]);

        Self {
            status: rows[0],
            indices: left[0],
            breadth: left[1],
            sectors: left[2],
            posture: middle[0],
            movers: middle[1],
            headlines: middle[2],
            watchlist: right[0],
            sources: right[1],
            input: rows[2],
        }
    }

    fn get(&self, region: Region) -> Rect {
        match region {
            Region::Status => self.status,
            Region::Indices => self.indices,
            Region::Breadth => self.breadth,
            Region::Sectors => self.sectors,
            Region::Movers => self.movers,
            Region::Posture => self.posture,
            Region::Headlines => self.headlines,
            Region::Sources => self.sources,
            Region::Watchlist => self.watchlist,
        }
    }
}

/// Terminal target: one bordered block per region
struct FramePresenter<'a, 'f> {
    frame: &'a mut Frame<'f>,
    areas: &'a RegionAreas,
    summary_failed: bool,
    watchlist_failed: bool,
}

impl Presenter for FramePresenter<'_, '_> {
    fn render(&mut self, region: Region, lines: Vec<Line<'static>>) {
        let failed = match region {
            Region::Watchlist => self.watchlist_failed,
            Region::Status => self.summary_failed,
            _ => false,
        };
        let block = Block::default()
            .title(region.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if failed { C_ALERT } else { C_ACCENT }));

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        self.frame.render_widget(paragraph, self.areas.get(region));
    }
}

fn draw(f: &mut Frame, view: &ViewState, options: &RenderOptions, app: &App) {
    let areas = RegionAreas::new(f.area());
    {
        let mut presenter = FramePresenter {
            frame: &mut *f,
            areas: &areas,
            summary_failed: view.summary.status.is_error(),
            watchlist_failed: view.watchlist.status.is_error(),
        };
        render_view(&mut presenter, view, options);
    }
    render_input(f, areas.input, app);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let field = |label: &'static str, value: &str, active: bool| {
        let style = if active {
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_DIM)
        };
        vec![
            Span::styled(label, Style::default().fg(C_DIM)),
            Span::styled(format!("{}{}", value, if active { "_" } else { "" }), style),
        ]
    };

    let line = match app.mode {
        InputMode::Normal => Line::from(Span::styled(
            "q quit  r refresh  w reload watchlist  a add  d remove  ↑/↓ select",
            Style::default().fg(C_DIM),
        )),
        mode => {
            let mut spans = field("Symbol: ", &app.symbol, mode == InputMode::Symbol);
            spans.push(Span::raw("   "));
            spans.extend(field("Notes: ", &app.notes, mode == InputMode::Notes));
            spans.push(Span::styled(
                "   (Tab switch, Enter add, Esc cancel)",
                Style::default().fg(C_DIM),
            ));
            Line::from(spans)
        }
    };

    let block = Block::default()
        .title(" ADD TO WATCHLIST ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    f.render_widget(Paragraph::new(line).block(block), area);
}
