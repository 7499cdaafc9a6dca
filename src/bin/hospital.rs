//! Hospital shift: doctors wait on a one-shot gate opened by the director

use anyhow::Result;

use conc_sims::config::{SimConfig, SimKind};
use conc_sims::sims::{self, hospital};
use conc_sims::utils::setup_logging;

fn main() -> Result<()> {
    setup_logging(false, false);
    let config = SimConfig::standalone(SimKind::Hospital);
    hospital::run(&config, sims::console_for(&config))?;
    Ok(())
}
