//! Quill entrypoint: argument parsing, logging bootstrap, terminal
//! lifecycle, and the synchronous key-dispatch loop.
//!
//! The loop is strictly sequential: paint a frame, block for one event,
//! decode it, apply it. There are no background tasks and no timers; the
//! editor is idle between keystrokes.

use anyhow::Result;
use clap::Parser;
use core_config::Config;
use core_terminal::{CrosstermBackend, TerminalBackend};
use core_view::Viewport;
use crossterm::event::{self, Event, KeyEventKind};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, trace};
use tracing_appender::non_blocking::WorkerGuard;

mod dispatch;
mod keys;
mod screen;

use dispatch::{Control, Dispatcher, open_session};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Quill text editor")]
struct Args {
    /// Path to open at startup. Created on first save if it does not exist.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `quill.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("quill.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "quill.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // A subscriber is already installed (tests); drop the guard so the
        // writer shuts down.
        Err(_) => Ok(None),
    }
}

fn install_panic_hook() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            tracing::error!(target: "runtime.panic", %panic_info, "panic");
            default_panic(panic_info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = core_config::load_from(args.config.clone())?;
    let _log_guard = configure_logging(&config)?;
    install_panic_hook();
    info!(target: "runtime", path = ?args.path, "startup");

    let mut session = open_session(args.path, config.message_ttl());

    let mut backend = CrosstermBackend::new();
    let title = match session.file_name().and_then(Path::file_name) {
        Some(name) => format!("quill: {}", name.to_string_lossy()),
        None => "quill".to_string(),
    };
    backend.set_title(&title)?;
    let guard = backend.enter_guard()?;
    let result = run_loop(&mut session, &config);
    // Restore the terminal before reporting anything to stderr.
    drop(guard);
    info!(target: "runtime", ok = result.is_ok(), "shutdown");
    result
}

fn run_loop(session: &mut core_session::EditSession, config: &Config) -> Result<()> {
    let mut viewport = Viewport::new();
    let mut dispatcher = Dispatcher::new(config.message_ttl());
    let mut out = stdout();
    loop {
        let (cols, rows) = core_terminal::screen_size()?;
        screen::refresh(&mut out, session, &mut viewport, cols, rows)?;
        match event::read()? {
            Event::Key(key)
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
            {
                let Some(command) = keys::translate(key) else {
                    continue;
                };
                trace!(target: "input", ?command, "dispatch");
                if dispatcher.execute(session, command) == Control::Quit {
                    break;
                }
            }
            // The next frame re-reads the size; nothing to do here.
            Event::Resize(_, _) => {}
            _ => {}
        }
    }
    Ok(())
}
