use alpha_monitor::{
    AlphaClient, MonitorConfig, MonitorState, Poller, PollerHandle, SharedState, TokenId,
    ViewState, derive_view,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, fs::OpenOptions, io, sync::Mutex, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod format;
mod ui;

use app::{App, Outcome};

const DEFAULT_LOG_FILE: &str = "alpha-monitor.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    let config = MonitorConfig::from_env()?;
    info!(
        endpoint = %config.endpoint,
        interval = ?config.refresh_interval,
        retention = ?config.retention,
        "starting alpha monitor"
    );

    let state = MonitorState::with_retention(config.retention).shared();
    let poller = Poller::new(AlphaClient::new(&config)?, state.clone());
    let handle = poller.spawn(config.refresh_interval);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(ViewState::default().with_refresh_interval(config.refresh_interval));
    let result = run_app(&mut terminal, app, &state, &handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    handle.shutdown().await;
    info!("alpha monitor stopped");

    result.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    state: &SharedState,
    poller: &PollerHandle,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        // Guard released before blocking on terminal input
        let visible = {
            let state = state.read();
            let view = derive_view(
                state.tokens(),
                &app.view.search,
                app.view.sort_field,
                app.view.sort_direction,
            );
            app.clamp_cursor(view.len());
            app.retain_selection(|id| state.tokens().iter().any(|token| token.id() == id));
            terminal.draw(|f| ui::render(f, &app, &state, &view))?;
            view.iter()
                .map(|token| token.id().clone())
                .collect::<Vec<TokenId>>()
        };

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match app.handle_key(key.code, &visible) {
                    Outcome::Quit => return Ok(()),
                    Outcome::Command(command) => poller.send(command),
                    Outcome::Continue => {}
                }
            }
        }
    }
}

/// Logs go to a file because the terminal is owned by the dashboard.
fn init_logging() -> Result<(), Box<dyn Error>> {
    let path = std::env::var("ALPHA_MONITOR_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
