//! conc-sims - run the concurrency simulations
//!
//! Runs every selected simulation in turn and optionally exports the run
//! reports as JSON.

use anyhow::Result;
use tracing::{error, info};

use conc_sims::config::{CliArgs, SimConfig};
use conc_sims::report::{write_json_file, SimRuns};
use conc_sims::sims;
use conc_sims::utils::setup_logging;

fn print_banner(config: &SimConfig) {
    if config.quiet {
        return;
    }

    println!("conc-sims v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!(
        "Simulations: {}",
        config
            .sims
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Pool size: {}, Time scale: {}, Seed: {}",
        config.pool_size, config.time_scale, config.seed
    );
    if config.failure_rate > 0.0 {
        println!("Failure rate: {:.0}%", config.failure_rate * 100.0);
    }
    println!("====================================\n");
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();

    // Child process of the squares simulation
    if let Some(n) = args.compute_square {
        sims::squares::child_main(n, args.time_scale);
        return Ok(());
    }

    setup_logging(args.verbose, args.quiet);

    let config =
        SimConfig::from_cli(&args).map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    print_banner(&config);
    let console = sims::console_for(&config);

    let mut all_runs: Vec<SimRuns> = Vec::with_capacity(config.sims.len());
    for kind in &config.sims {
        let runs = sims::run(*kind, &config, console.clone())?;
        all_runs.push(runs);
    }

    if let Some(ref output_path) = config.output_path {
        info!("Writing results to: {:?}", output_path);
        write_json_file(output_path, config.seed, &all_runs)?;
    }

    let total_tasks: usize = all_runs
        .iter()
        .flat_map(|r| r.reports.iter())
        .map(|r| r.outcomes.len())
        .sum();
    let total_failures: usize = all_runs
        .iter()
        .flat_map(|r| r.reports.iter())
        .map(|r| r.failures.len())
        .sum();

    if !config.quiet {
        println!("\n====================================");
        println!("SIMULATIONS COMPLETE");
        println!("====================================");
        println!("Simulations run: {}", all_runs.len());
        println!("Tasks completed: {}", total_tasks);
        println!("Tasks failed: {}", total_failures);
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
