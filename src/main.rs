use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use hopstack::app::cli::Args;
use hopstack::app::config::AppConfig;
use hopstack::app::events::AppEvent;
use hopstack::app::keys::KeyIntent;
use hopstack::app::worker::{self, SharedController};
use hopstack::app::{logging, ActionSettings, App};
use hopstack::player;
use hopstack::stack::NavigationController;
use hopstack::ui;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let args = Args::parse();

    if args.generate_config {
        print!("{}", AppConfig::default().to_toml()?);
        return Ok(());
    }

    let _log_guard = logging::init(&AppConfig::get_log_dir())?;
    let config = AppConfig::load(args.config.as_deref())?;
    info!(demo = args.demo, "Starting hopstack");

    // The blocking HTTP client must be created and dropped outside the async runtime,
    // so the controller is built here and outlives `block_on`.
    let service = player::get_player(&config, args.demo)?;
    let mut controller = NavigationController::new(service, config.controller_options());
    let settings = ActionSettings {
        seek_step_secs: config.seek_step_secs,
        queue_size: config.queue_size,
    };

    if let Some(command) = args.command {
        let status = command.run(&mut controller, &settings)?;
        println!("{}", status);
        return Ok(());
    }

    let controller = Arc::new(Mutex::new(controller));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let result = runtime.block_on(run_ui(controller.clone(), &config, settings, args.demo));
    drop(runtime);
    drop(controller);
    result
}

async fn run_ui(controller: SharedController, config: &AppConfig, settings: ActionSettings, demo: bool) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config.keys.clone(), settings, demo);
    let result = event_loop(&mut terminal, app, controller, config.refresh_interval_ms).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    controller: SharedController,
    refresh_interval_ms: u64,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(100);
    let (actions, _worker) = worker::spawn_action_worker(controller.clone(), app.settings, tx.clone());

    // 1. Input Event Task
    let tx_input = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if tx_input.send(AppEvent::Input(event)).await.is_err() {
                break;
            }
        }
    });

    // 2. Periodic refresh; the first tick fires immediately
    let tx_refresh = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(refresh_interval_ms.max(100)));
        loop {
            interval.tick().await;
            if tx_refresh.send(AppEvent::RefreshDue).await.is_err() {
                break;
            }
        }
    });

    // 3. Redraw tick for progress interpolation and toasts ⚡
    let tx_tick = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_RATE);
        loop {
            interval.tick().await;
            if tx_tick.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    while app.is_running {
        terminal.draw(|f| ui::ui(f, &app))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        match event {
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match app.keys.intent(key) {
                    Some(KeyIntent::Quit) => app.is_running = false,
                    Some(KeyIntent::Run(action)) => {
                        app.show_toast(&format!("{}...", action.label()));
                        if actions.send(action).is_err() {
                            error!(?action, "Action worker is gone");
                            app.status = "Error: action worker stopped".to_string();
                        }
                    }
                    None => {}
                }
            }
            AppEvent::Input(_) => {}
            AppEvent::RefreshDue => request_refresh(&mut app, &controller, &tx),
            AppEvent::Refreshed(state) => {
                app.apply_refresh(state);
                if app.refresh.complete() {
                    spawn_refresh(controller.clone(), tx.clone());
                }
            }
            AppEvent::RefreshFailed(message) => {
                app.status = message;
                if app.refresh.complete() {
                    spawn_refresh(controller.clone(), tx.clone());
                }
            }
            AppEvent::ActionDone(status) => {
                app.apply_action_result(status);
                request_refresh(&mut app, &controller, &tx);
            }
            AppEvent::Tick => app.on_tick(),
        }
    }

    info!("Quitting");
    Ok(())
}

/// Starts a refresh unless one is running; then it is only marked pending.
fn request_refresh(app: &mut App, controller: &SharedController, tx: &mpsc::Sender<AppEvent>) {
    if app.refresh.request() {
        spawn_refresh(controller.clone(), tx.clone());
    }
}

fn spawn_refresh(controller: SharedController, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || worker::lock(&controller).display_state()).await;
        let event = match result {
            Ok(state) => AppEvent::Refreshed(state),
            Err(e) => {
                error!("Refresh task failed: {}", e);
                AppEvent::RefreshFailed(format!("Refresh error: {}", e))
            }
        };
        let _ = tx.send(event).await;
    });
}
