//! Download simulator: sequential vs thread per file vs pool

use anyhow::Result;

use conc_sims::config::{SimConfig, SimKind};
use conc_sims::sims::{self, downloads};
use conc_sims::utils::setup_logging;

fn main() -> Result<()> {
    setup_logging(false, false);
    let config = SimConfig::standalone(SimKind::Downloads);
    downloads::run(&config, sims::console_for(&config))?;
    Ok(())
}
