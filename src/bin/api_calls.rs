//! Three API calls awaited concurrently on one thread

use anyhow::Result;

use conc_sims::config::{SimConfig, SimKind};
use conc_sims::sims::{self, api};
use conc_sims::utils::setup_logging;

fn main() -> Result<()> {
    setup_logging(false, false);
    let mut config = SimConfig::standalone(SimKind::Api);
    config.color = false;
    api::run(&config, sims::console_for(&config))?;
    Ok(())
}
