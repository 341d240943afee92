//! Launchpad TUI - Terminal User Interface
//!
//! Ratatui-based terminal interface for scanning, installing and launching
//! game clients and searching the mod registry.

mod app;
mod ui;

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launchpad_core::config::ConfigStore;
use launchpad_core::context::AppContext;
use launchpad_core::orchestration::{InstallOutcome, LaunchOutcome, RefreshOutcome};

use crate::app::{App, Intent, Notice};

const TICK: Duration = Duration::from_millis(100);
const LOG_FILE: &str = "launchpad-tui.log";

fn main() -> anyhow::Result<()> {
    // Log to a file; stdout belongs to the terminal UI.
    let log_path = std::env::temp_dir().join(LOG_FILE);
    let log_file = File::create(&log_path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "launchpad_tui=debug,launchpad_core=debug,info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let config = ConfigStore::from_default_location()?.load_with_env()?;
    let runtime = Runtime::new()?;
    let ctx = Arc::new(AppContext::from_config(config)?);
    info!(log = %log_path.display(), "starting launchpad TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_tui(&mut terminal, runtime.handle(), &ctx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    runtime: &Handle,
    ctx: &Arc<AppContext>,
) -> anyhow::Result<()> {
    let (notices, mut inbox) = mpsc::unbounded_channel();
    let mut app = App::new();
    dispatch(runtime, ctx, &notices, Intent::LoadInitial);

    loop {
        while let Ok(notice) = inbox.try_recv() {
            app.notify(notice);
        }

        let snapshot = ctx.registry().snapshot();
        terminal.draw(|frame| ui::draw(frame, &app, &snapshot))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key, &snapshot) {
                Some(Intent::Quit) => return Ok(()),
                Some(intent) => dispatch(runtime, ctx, &notices, intent),
                None => {}
            }
        }
    }
}

/// Run `intent` on the runtime and report its outcome to the footer.
fn dispatch(
    runtime: &Handle,
    ctx: &Arc<AppContext>,
    notices: &UnboundedSender<Notice>,
    intent: Intent,
) {
    let ctx = Arc::clone(ctx);
    let notices = notices.clone();
    runtime.spawn(async move {
        if let Some(notice) = execute_intent(&ctx, intent).await {
            let _ = notices.send(notice);
        }
    });
}

async fn execute_intent(ctx: &AppContext, intent: Intent) -> Option<Notice> {
    match intent {
        Intent::Quit => None,
        Intent::LoadInitial => {
            // The probe only adds context; clients are listed either way.
            let (healthy, load) =
                tokio::join!(ctx.discovery().health(), ctx.discovery().load_initial());
            refresh_notice("Scan", load.available)
                .or_else(|| refresh_notice("Listing installed", load.installed))
                .or_else(|| (!healthy).then(|| unhealthy_notice(ctx)))
        }
        Intent::Scan => refresh_notice("Scan", ctx.discovery().scan().await),
        Intent::RefreshInstalled => {
            refresh_notice("Listing installed", ctx.discovery().refresh_installed().await)
        }
        Intent::Install(client) => match ctx.installer().install(&client).await {
            InstallOutcome::Installed { message } => Some(Notice::info(message)),
            InstallOutcome::AlreadyInstalling => None,
            InstallOutcome::Failed { reason } => Some(Notice::error(format!(
                "Installing {} failed: {}",
                client.name, reason
            ))),
        },
        Intent::Launch(client) => match ctx.launcher().launch(&client).await {
            LaunchOutcome::Launched(handle) => Some(Notice::info(format!(
                "Launched {} (PID {})",
                client.name, handle.pid
            ))),
            LaunchOutcome::Failed { reason } => Some(Notice::error(format!(
                "Launching {} failed: {}",
                client.name, reason
            ))),
        },
        // Search state, failures included, is rendered from the registry.
        Intent::Search(query) => {
            ctx.search().search(&query).await;
            None
        }
    }
}

fn unhealthy_notice(ctx: &AppContext) -> Notice {
    let url = &ctx.config().service.url;
    warn!(url = %url, "local client service reported unhealthy");
    Notice::error(format!("Local client service at {url} did not pass its health check"))
}

fn refresh_notice(what: &str, outcome: RefreshOutcome) -> Option<Notice> {
    match outcome {
        RefreshOutcome::Failed { reason } => Some(Notice::error(format!("{what} failed: {reason}"))),
        RefreshOutcome::Applied { .. } | RefreshOutcome::Stale => None,
    }
}
