use mindmap_tui::{actions, app, config, dispatch, event, logging, ui};

use anyhow::{Context, Result};
use app::AppState;
use clap::Parser;
use config::{load_config, CliArgs};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dispatch::{Dispatcher, Effect};
use mindmap_tui::api::{Backend, HttpBackend, MockBackend};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(120);

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    logging::init_logging(&config.log_file, &config.log_level)?;
    info!(base_url = %config.base_url, offline = config.offline, "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let backend: Arc<dyn Backend> = if config.offline {
        Arc::new(MockBackend::new())
    } else {
        Arc::new(HttpBackend::new(&config.base_url, config.session_cookie.as_deref())?)
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(Arc::clone(&backend), tx, runtime.handle().clone());

    // Create application state
    let mut app = AppState::new(config).with_login_url(backend.login_url());

    // The admin route only opens once this probe confirms the user
    app.session.begin_probe();
    dispatcher.dispatch(Effect::ProbeSession);
    info!(route = ?app.route, "session probe dispatched");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear the terminal
    terminal.clear()?;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app, &dispatcher, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors from the main loop
    if let Err(err) = res {
        error!(error = %err, "main loop failed");
        eprintln!("Error: {}", err);
    }

    // In-flight requests are abandoned
    runtime.shutdown_timeout(Duration::from_millis(200));
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dispatcher: &Dispatcher,
    rx: &mut UnboundedReceiver<actions::Action>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Apply completions from the dispatcher
        while let Ok(action) = rx.try_recv() {
            let effects = actions::execute_action(action, app)?;
            dispatcher.dispatch_all(effects);
        }

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            if !matches!(action, actions::Action::Resize(..)) {
                app.clear_message();
            }
            let effects = actions::execute_action(action, app)?;
            dispatcher.dispatch_all(effects);
        }

        if last_tick.elapsed() >= TICK_RATE {
            actions::execute_action(actions::Action::Tick, app)?;
            last_tick = Instant::now();
        }
    }

    Ok(())
}
