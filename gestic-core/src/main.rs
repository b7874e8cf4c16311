//! src/main.rs
//! Snapshot disk-usage comparison TUI: wiring of config, logging, terminal
//! and the render/event/dispatch loop.

use std::{
    io::{self, Stdout},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{signal, sync::mpsc};
use tracing::{info, warn};

use gestic_core::{
    AppState, Logger,
    config::{Config, ConfigOverrides},
    controller::{
        action_dispatcher::{ActionDispatcher, DispatchResult},
        event_loop::{EventLoop, TaskResult},
        handlers::KeyContext,
    },
    logging::install_panic_hook,
    model::snapshot::SnapshotPair,
    restic::{ResticCli, SnapshotSource},
    util::clipboard::SystemClipboard,
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Compare disk usage between two restic snapshots.
#[derive(Parser, Debug)]
#[command(name = "gestic", version, about)]
struct Cli {
    /// Restic repository passed to `restic -r`.
    #[arg(short, long)]
    repo: Option<PathBuf>,

    /// Directory where `restic mount` exposes the repository.
    #[arg(short, long)]
    mount: Option<PathBuf>,

    /// Restic executable.
    #[arg(long)]
    restic_bin: Option<PathBuf>,

    /// Forwarded to restic as `--password-file`.
    #[arg(long)]
    password_file: Option<PathBuf>,

    /// Give up building a snapshot tree after this long, e.g. `10m`.
    #[arg(long, value_parser = humantime::parse_duration)]
    scan_timeout: Option<Duration>,

    /// Log filter, e.g. `debug` or `gestic_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Print the checked snapshot list and exit.
    #[arg(long)]
    list: bool,

    /// Compare two directories directly, skipping snapshot selection.
    #[arg(long, requires = "older", conflicts_with = "list")]
    newer: Option<PathBuf>,

    #[arg(long, requires = "newer")]
    older: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            repo: self.repo.clone(),
            mount: self.mount.clone(),
            restic_bin: self.restic_bin.clone(),
            password_file: self.password_file.clone(),
            scan_timeout: self.scan_timeout,
            log_level: self.log_level.clone(),
        }
    }
}

enum StartMode {
    Repository(Arc<ResticCli>),
    Direct(SnapshotPair),
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().await;
    config.apply(cli.overrides());

    let _log_guard = Logger::new(config.resolved_log_dir())
        .with_level(&config.log_level)
        .with_stderr(cli.list)
        .init_tracing()?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting gestic");

    if cli.list {
        return print_snapshots(&config).await;
    }

    let mode = match (cli.newer, cli.older) {
        (Some(newer), Some(older)) => StartMode::Direct(SnapshotPair::from_dirs(newer, older)),
        _ => StartMode::Repository(Arc::new(
            ResticCli::from_config(&config).context("Cannot list snapshots")?,
        )),
    };

    install_panic_hook(restore_terminal);

    let app = App::new(&config).context("Failed to initialize application")?;
    app.run(mode).await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

/// `--list`: the checked snapshot list on stdout, one per line.
async fn print_snapshots(config: &Config) -> Result<()> {
    let restic = ResticCli::from_config(config).context("Cannot list snapshots")?;
    let snapshots = restic.list_snapshots().await?;
    for snapshot in &snapshots {
        println!("{snapshot}");
    }
    Ok(())
}

struct App {
    terminal: AppTerminal,
    event_loop: EventLoop,
    dispatcher: ActionDispatcher<SystemClipboard>,
    renderer: UIRenderer,
    state: AppState,
}

impl App {
    fn new(config: &Config) -> Result<Self> {
        theme::init_theme();

        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();
        let dispatcher = ActionDispatcher::new(
            task_tx,
            config.scan_timeout,
            config.page_size,
            SystemClipboard::new(),
        );

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        Ok(Self {
            terminal,
            event_loop: EventLoop::new(task_rx),
            dispatcher,
            renderer: UIRenderer::new(),
            state: AppState::new(),
        })
    }

    async fn run(mut self, mode: StartMode) -> Result<()> {
        let size = self.terminal.size().context("Failed to read terminal size")?;
        self.state.viewport = (size.width, size.height);

        match mode {
            StartMode::Repository(restic) => self.dispatcher.start_listing(&mut self.state, restic),
            StartMode::Direct(pair) => {
                self.state.direct_mode = true;
                self.dispatcher.start_compare(&mut self.state, pair);
            }
        }

        loop {
            self.render()?;

            let ctx = KeyContext::new(self.state.screen, self.state.ui.overlay());
            let actions = tokio::select! {
                actions = self.event_loop.next_actions(ctx) => actions,
                _ = shutdown_signal() => {
                    info!("Shutdown signal received");
                    break;
                }
            };

            let Some(actions) = actions else { break };
            for action in actions {
                if self.dispatcher.dispatch(&mut self.state, action) == DispatchResult::Quit {
                    info!("Quit requested");
                    return Ok(());
                }
            }
        }

        info!("Event loop terminated");
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        if !self.state.ui.needs_redraw() {
            return Ok(());
        }

        let renderer = &mut self.renderer;
        let state = &self.state;
        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, state))
            .context("Failed to draw frame")?;
        self.state.ui.clear_redraw();
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let stats = self.renderer.stats();
        info!(frames = stats.frames, slow_frames = stats.slow, "Render statistics");

        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal as unix_signal};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }
            Err(e) => {
                warn!("Failed to create SIGTERM handler: {}", e);
                let _ = signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    info!("Terminal cleanup complete");
    Ok(())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stderr(), LeaveAlternateScreen);
}
