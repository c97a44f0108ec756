//! NexusAI terminal desktop entry point.
//!
//! Runs the terminal on stdin/stdout. Type commands and press Enter;
//! `exit` or Ctrl-D (the Escape equivalent here) closes the terminal.

mod input;
mod render;

use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use anyhow::Result;

use input::InputEvent;
use nexus_terminal::{ResponseGenerator, TerminalEvent, TerminalSession};
use nexus_types::config::TerminalConfig;
use render::TranscriptPrinter;

/// Render cadence; finer than the typing cadence so no character lags.
const FRAME: Duration = Duration::from_millis(15);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve config from CLI arg, NEXUS_CONFIG env var, or built-in defaults.
    let config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("NEXUS_CONFIG").ok())
    {
        Some(path) => TerminalConfig::load(&PathBuf::from(path))?,
        None => TerminalConfig::default(),
    };

    let mut session = TerminalSession::open(config, ResponseGenerator::new());
    let mut printer = TranscriptPrinter::new();
    let mut stdout = std::io::stdout();
    let keys = input::spawn_stdin_reader();
    let started = Instant::now();

    'running: loop {
        match keys.recv_timeout(FRAME) {
            Ok(InputEvent::Line(line)) => session.submit(&line),
            Ok(InputEvent::Escape) | Err(RecvTimeoutError::Disconnected) => session.escape(),
            Err(RecvTimeoutError::Timeout) => {},
        }

        // Logical time follows wall time since start.
        let wall_ms = started.elapsed().as_millis() as u64;
        session.advance(wall_ms.saturating_sub(session.now()));
        printer.render(session.transcript(), &mut stdout)?;

        for event in session.drain_events() {
            match event {
                TerminalEvent::Busy { duration_ms } => {
                    log::debug!("Terminal busy for {duration_ms}ms");
                },
                TerminalEvent::CloseRequested => break 'running,
            }
        }
        if !session.is_open() {
            break;
        }
    }

    let generator = session.into_generator();
    log::info!(
        "NexusAI terminal shut down ({} wallet reports cached)",
        generator.wallet_cache().len()
    );
    Ok(())
}
