use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use widget_market::config::consts::DEFAULT_LOG_FILE;
use widget_market::config::{MarketArgs, MarketConfig};
use widget_market::dashboard::{
    ActionRequest, App, DashboardState, MarketActions, Outcome, Screen,
};
use widget_market::tui::{edit_text, poll_event, pressed_key, Focus, GateField};
use widget_market::types::{format_short_hex, MarketplaceRef};
use widget_market::wallet::display_session_banner;
use widget_market::{ChainReader, HttpWallet, MarketReader, SuiRpcClient, WalletSession};

/// Widget Marketplace - Interactive TUI for minting, listing and buying widgets
#[derive(Parser)]
#[command(name = "widget_market")]
#[command(about = "Widget Marketplace - Interactive TUI", long_about = None)]
struct Cli {
    #[clap(flatten)]
    market: MarketArgs,

    /// File the TUI writes its logs to
    #[arg(long, env = "LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: String,
}

/// Messages from background tasks to the UI loop
enum UiEvent {
    Outcome(Outcome),
    Alert(String),
}

/// View-only state: focus and quit flag
struct ViewState {
    gate_field: GateField,
    focus: Focus,
    should_quit: bool,
}

impl ViewState {
    fn new() -> Self {
        Self {
            gate_field: GateField::PackageId,
            focus: Focus::Commands,
            should_quit: false,
        }
    }
}

/// Everything a dashboard action needs to run in the background
struct Session {
    chain: Arc<dyn ChainReader>,
    wallet: Arc<dyn WalletSession>,
    fetch_concurrency: usize,
    actions: Option<MarketActions>,
    events: UnboundedSender<UiEvent>,
}

impl Session {
    fn open(&mut self, market: MarketplaceRef) {
        info!(
            package_id = %market.package_id,
            marketplace_id = %market.marketplace_id,
            "Marketplace selected"
        );
        let reader = MarketReader::new(Arc::clone(&self.chain), market, self.fetch_concurrency);
        self.actions = Some(MarketActions::new(reader, Arc::clone(&self.wallet)));
    }

    fn spawn(&self, request: ActionRequest, state: &mut DashboardState) {
        let Some(actions) = self.actions.clone() else {
            return;
        };
        state.started();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = actions.run(request).await;
            let _ = events.send(UiEvent::Outcome(outcome));
        });
    }

    fn connect_wallet(&self) {
        let wallet = Arc::clone(&self.wallet);
        let events = self.events.clone();
        tokio::spawn(async move {
            match wallet.connect().await {
                Ok(Some(account)) => info!(account = %account, "Wallet connected"),
                Ok(None) => {
                    let _ = events.send(UiEvent::Alert("Wallet has no account selected".into()));
                }
                Err(e) => {
                    error!(error = %format!("{e:#}"), "Failed to connect wallet");
                    let _ = events.send(UiEvent::Alert("Failed to connect wallet".into()));
                }
            }
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let config = MarketConfig::load(cli.market)?;
    let chain: Arc<dyn ChainReader> = Arc::new(SuiRpcClient::new(config.rpc_url.clone()));
    let wallet: Arc<dyn WalletSession> = Arc::new(HttpWallet::new(config.wallet_url.clone()));

    if let Err(e) = wallet.connect().await {
        warn!(error = %format!("{e:#}"), "Wallet bridge unavailable, press 'c' to retry");
    }
    display_session_banner(
        config.marketplace().as_ref(),
        wallet.active_account().as_ref(),
        &config.rpc_url,
        &config.wallet_url,
    );

    let toast_ttl = Duration::from_millis(config.settings.toast_ms);
    let app = match config.marketplace() {
        Some(market) => App::unlocked(market, toast_ttl),
        None => App::new(toast_ttl),
    };

    let (events, receiver) = mpsc::unbounded_channel();
    let mut session = Session {
        chain,
        wallet,
        fetch_concurrency: config.settings.fetch_concurrency,
        actions: None,
        events,
    };
    if let Some(market) = app.marketplace() {
        session.open(market.clone());
    }

    run_tui(app, session, receiver).await
}

fn init_tracing(log_file: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {log_file}"))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
    Ok(())
}

async fn run_tui(
    app: App,
    session: Session,
    receiver: mpsc::UnboundedReceiver<UiEvent>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(&mut terminal, app, session, receiver).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut session: Session,
    mut receiver: mpsc::UnboundedReceiver<UiEvent>,
) -> Result<()> {
    let mut view = ViewState::new();
    let mut account = session.wallet.subscribe_account();
    app.state.set_account(account.borrow_and_update().clone());

    loop {
        // Results of finished background tasks
        while let Ok(event) = receiver.try_recv() {
            match event {
                UiEvent::Outcome(outcome) => {
                    app.state.apply(outcome);
                }
                UiEvent::Alert(message) => app.state.raise_alert(message),
            }
        }

        if account.has_changed().unwrap_or(false) {
            app.state.set_account(account.borrow_and_update().clone());
        }

        app.state.expire_toasts(Instant::now());
        terminal.draw(|f| ui(f, &app, &view))?;

        if let Some(event) = poll_event(Duration::from_millis(100))? {
            if let Some(code) = pressed_key(&event) {
                handle_key(code, &mut app, &mut view, &mut session);
            }
        }

        if view.should_quit {
            break;
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}

fn handle_key(code: KeyCode, app: &mut App, view: &mut ViewState, session: &mut Session) {
    // Alerts block everything until dismissed
    if app.state.alert().is_some() {
        if matches!(code, KeyCode::Enter | KeyCode::Esc) {
            app.state.dismiss_alert();
        }
        return;
    }

    let on_gate = matches!(app.screen, Screen::IdEntry(_));
    match code {
        _ if !on_gate => handle_dashboard_key(code, &mut app.state, view, session),
        KeyCode::Esc => view.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => view.gate_field = view.gate_field.next(),
        KeyCode::Enter => {
            if let Some(market) = app.submit_ids() {
                session.open(market);
            }
        }
        code => {
            if let Screen::IdEntry(entry) = &mut app.screen {
                edit_text(view.gate_field.value_mut(entry), code, false);
            }
        }
    }
}

fn handle_dashboard_key(
    code: KeyCode,
    state: &mut DashboardState,
    view: &mut ViewState,
    session: &mut Session,
) {
    match code {
        KeyCode::Tab => {
            view.focus = view.focus.next();
            return;
        }
        KeyCode::BackTab => {
            view.focus = view.focus.prev();
            return;
        }
        _ => {}
    }

    if view.focus == Focus::Commands {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => view.should_quit = true,
            KeyCode::Char('c') => session.connect_wallet(),
            KeyCode::Char('m') => session.spawn(ActionRequest::Mint, state),
            KeyCode::Char('l') => session.spawn(state.form.list_request(), state),
            KeyCode::Char('b') => session.spawn(state.form.purchase_request(), state),
            KeyCode::Char('p') => session.spawn(ActionRequest::TakeProfits, state),
            KeyCode::Char('w') => session.spawn(ActionRequest::RefreshWidgets, state),
            KeyCode::Char('g') => session.spawn(ActionRequest::RefreshListings, state),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Esc => view.focus = Focus::Commands,
        KeyCode::Enter => {
            let request = match view.focus {
                Focus::WidgetToList | Focus::Price => state.form.list_request(),
                _ => state.form.purchase_request(),
            };
            session.spawn(request, state);
        }
        code => {
            let numeric = view.focus.is_numeric();
            if let Some(value) = view.focus.value_mut(&mut state.form) {
                edit_text(value, code, numeric);
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match &app.screen {
        Screen::IdEntry(entry) => render_gate(f, chunks[1], entry, view),
        Screen::Dashboard(_) => render_dashboard(f, chunks[1], &app.state, view),
    }

    render_footer(f, chunks[2], app, view);

    if let Some(message) = app.state.alert() {
        render_alert(f, message);
    }
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let marketplace = app
        .marketplace()
        .map(|m| m.marketplace_id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let account = match &app.state.account {
        Some(address) => Span::styled(format_short_hex(address.as_str()), Style::default().fg(Color::Green)),
        None => Span::styled("press 'c' to connect wallet", Style::default().fg(Color::Red)),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled("MarketplaceId: ", Style::default().fg(Color::Cyan)),
        Span::raw(marketplace),
        Span::raw("  │  "),
        Span::styled("Account: ", Style::default().fg(Color::Cyan)),
        account,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Widget Marketplace")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );

    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused {
        highlight()
    } else {
        Style::default().fg(Color::White)
    };
    let input = Paragraph::new(value.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(border),
    );
    f.render_widget(input, area);
}

fn render_gate(f: &mut Frame, area: Rect, entry: &widget_market::dashboard::IdEntry, view: &ViewState) {
    let width = 72.min(area.width);
    let column = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height.saturating_sub(9) / 2,
        width,
        height: 9.min(area.height),
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(column);

    render_input(
        f,
        rows[0],
        GateField::PackageId.title(),
        &entry.package_id,
        view.gate_field == GateField::PackageId,
    );
    render_input(
        f,
        rows[1],
        GateField::MarketplaceId.title(),
        &entry.marketplace_id,
        view.gate_field == GateField::MarketplaceId,
    );

    let submit = Paragraph::new(Line::from(vec![
        Span::styled("Enter", highlight()),
        Span::raw(": Submit"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(submit, rows[2]);
}

fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState, view: &ViewState) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(halves[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(halves[1]);

    render_listings(f, top[0], state, view);
    render_widgets(f, top[1], state);
    render_purchase(f, bottom[0], state, view);
    render_profits(f, bottom[1], state);
}

fn render_listings(f: &mut Frame, area: Rect, state: &DashboardState, view: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Marketplace Listings ({})", state.listings.len()))
        .title_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);
    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[0]);

    render_input(
        f,
        inputs[0],
        Focus::WidgetToList.title(),
        &state.form.widget_to_list,
        view.focus == Focus::WidgetToList,
    );
    render_input(
        f,
        inputs[1],
        Focus::Price.title(),
        &state.form.price,
        view.focus == Focus::Price,
    );

    let items: Vec<ListItem> = state
        .listings
        .iter()
        .enumerate()
        .map(|(idx, listing)| {
            let mut lines = vec![Line::from(Span::styled(
                format!("Item {idx}"),
                Style::default().fg(Color::Yellow),
            ))];
            lines.extend(
                listing
                    .lines()
                    .into_iter()
                    .map(|line| Line::from(format!("  • {line}"))),
            );
            ListItem::new(lines)
        })
        .collect();

    f.render_widget(List::new(items), chunks[1]);
}

fn render_widgets(f: &mut Frame, area: Rect, state: &DashboardState) {
    let items: Vec<ListItem> = state
        .owned_widgets
        .iter()
        .enumerate()
        .map(|(idx, widget)| ListItem::new(format!("{}. {}", idx + 1, widget)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Currently owned widgets ({})", state.owned_widgets.len()))
            .title_style(Style::default().fg(Color::Green)),
    );
    f.render_widget(list, area);
}

fn render_purchase(f: &mut Frame, area: Rect, state: &DashboardState, view: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Purchase Listing")
        .title_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);
    render_input(
        f,
        rows[0],
        Focus::ItemToPurchase.title(),
        &state.form.item_to_purchase,
        view.focus == Focus::ItemToPurchase,
    );
    render_input(
        f,
        rows[1],
        Focus::AmountSent.title(),
        &state.form.amount_sent,
        view.focus == Focus::AmountSent,
    );
}

fn render_profits(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("p", highlight()),
            Span::raw(": take profits"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("In flight: ", Style::default().fg(Color::Cyan)),
            Span::styled(state.in_flight().to_string(), Style::default().fg(Color::Yellow)),
        ]),
    ];
    for toast in &state.toasts {
        lines.push(Line::from(Span::styled(
            format!("✔ {}", toast.message),
            Style::default().fg(Color::Green),
        )));
    }

    let profits = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Profits")
                .title_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(profits, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, view: &ViewState) {
    let keys: &[(&str, &str)] = match (&app.screen, view.focus) {
        (Screen::IdEntry(_), _) => &[("Tab", "Switch field  "), ("Enter", "Submit  "), ("Esc", "Quit  ")],
        (Screen::Dashboard(_), Focus::Commands) => &[
            ("q", "Quit  "),
            ("c", "Connect  "),
            ("m", "Mint  "),
            ("l", "List  "),
            ("b", "Buy  "),
            ("p", "Profits  "),
            ("w", "Widgets  "),
            ("g", "Listings  "),
            ("Tab", "Inputs  "),
        ],
        (Screen::Dashboard(_), _) => &[("Tab", "Next field  "), ("Enter", "Submit  "), ("Esc", "Commands  ")],
    };

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label)| vec![Span::styled(*key, highlight()), Span::raw(": "), Span::raw(*label)])
        .collect();

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Controls")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(footer, area);
}

fn render_alert(f: &mut Frame, message: &str) {
    // Create a centered popup area
    let area = f.area();
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height.saturating_sub(4));
    let popup_area = Rect {
        x: (area.width.saturating_sub(popup_width)) / 2,
        y: (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("Enter", highlight()), Span::raw(": OK")]),
    ];

    let dialog = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Alert")
                .title_style(
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(dialog, popup_area);
}
