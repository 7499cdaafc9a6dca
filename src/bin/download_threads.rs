//! Three downloads, one thread each

use anyhow::Result;

use conc_sims::config::{SimConfig, SimKind};
use conc_sims::sims::{self, download_threads};
use conc_sims::utils::setup_logging;

fn main() -> Result<()> {
    setup_logging(false, false);
    let mut config = SimConfig::standalone(SimKind::DownloadThreads);
    config.color = false;
    download_threads::run(&config, sims::console_for(&config))?;
    Ok(())
}
