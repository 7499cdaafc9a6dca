//! Squares computed in child processes
//!
//! Invoked without arguments this is the parent; the parent re-runs this
//! executable with `--compute-square N` for each child.

use std::env;

use anyhow::Result;

use conc_sims::config::{SimConfig, SimKind};
use conc_sims::sims::{self, squares};
use conc_sims::utils::setup_logging;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if let Some((n, time_scale)) = squares::parse_child_args(&args) {
        squares::child_main(n, time_scale);
        return Ok(());
    }

    setup_logging(false, false);
    let mut config = SimConfig::standalone(SimKind::Squares);
    config.color = false;
    squares::run(&config, sims::console_for(&config))?;
    Ok(())
}
