//! The simulations
//!
//! Each simulation builds its work items from the configuration, runs them
//! through one of the runners in `pool`, prints its own results and returns
//! the run reports for export.

pub mod api;
pub mod download_threads;
pub mod downloads;
pub mod hospital;
pub mod race;
pub mod squares;

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use tracing::info;

use crate::config::{SimConfig, SimKind};
use crate::report::SimRuns;
use crate::sync::Console;
use crate::utils::Result;

/// Console configured from the output flags
pub fn console_for(config: &SimConfig) -> Arc<Console> {
    Arc::new(Console::stdout(config.color, config.quiet))
}

/// Wait for ENTER when pausing is enabled and stdin is a terminal
pub fn pause(config: &SimConfig, console: &Console, prompt: &str) -> Result<()> {
    if !config.pause || console.is_quiet() || !io::stdin().is_terminal() {
        return Ok(());
    }

    print!("\n  {} ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

/// Run one simulation and return its reports
pub fn run(kind: SimKind, config: &SimConfig, console: Arc<Console>) -> Result<SimRuns> {
    info!("Starting simulation: {}", kind);
    let reports = match kind {
        SimKind::Race => vec![race::run(config, console)?.report],
        SimKind::Hospital => vec![hospital::run(config, console)?.report],
        SimKind::Downloads => downloads::run(config, console)?.reports,
        SimKind::DownloadThreads => vec![download_threads::run(config, console)?],
        SimKind::Api => vec![api::run(config, console)?],
        SimKind::Squares => vec![squares::run(config, console)?],
    };
    Ok(SimRuns { sim: kind, reports })
}
