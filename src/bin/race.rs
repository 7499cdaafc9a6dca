//! Runners race: one thread per runner, finish order under a lock

use anyhow::Result;

use conc_sims::config::{SimConfig, SimKind};
use conc_sims::sims::{self, race};
use conc_sims::utils::setup_logging;

fn main() -> Result<()> {
    setup_logging(false, false);
    let config = SimConfig::standalone(SimKind::Race);
    race::run(&config, sims::console_for(&config))?;
    Ok(())
}
