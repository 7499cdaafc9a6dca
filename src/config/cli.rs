//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Largest accepted `--time-scale`
pub const MAX_TIME_SCALE: f64 = 1000.0;

/// Concurrency simulations: threads, pools, locks, gates, async tasks and processes
#[derive(Parser, Debug, Clone)]
#[command(name = "conc-sims")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Selection =====
    /// Simulations to run, comma separated
    /// (race, hospital, downloads, download-threads, api, squares, all)
    #[arg(short = 't', long = "sims", value_delimiter = ',', default_value = "all")]
    pub sims: Vec<String>,

    // ===== Execution =====
    /// Worker count for pooled downloads
    #[arg(long = "pool-size", default_value_t = 3)]
    pub pool_size: usize,

    /// Seed for simulated durations (0 = random)
    #[arg(long = "seed", default_value_t = 0)]
    pub seed: u64,

    /// Multiplier applied to every simulated duration
    #[arg(long = "time-scale", default_value_t = 1.0)]
    pub time_scale: f64,

    /// Probability that a simulated download fails
    #[arg(long = "failure-rate", default_value_t = 0.0)]
    pub failure_rate: f64,

    // ===== Output =====
    /// Do not wait for ENTER before starting
    #[arg(long = "no-pause")]
    pub no_pause: bool,

    /// Disable ANSI colours
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Write run reports as JSON
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Only print errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Child-process entry point used by the squares simulation
    #[arg(long = "compute-square", hide = true)]
    pub compute_square: Option<u64>,
}

impl CliArgs {
    /// Parse from the process arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.pool_size == 0 {
            return Err("--pool-size must be at least 1".to_string());
        }

        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err("--time-scale must be a positive number".to_string());
        }

        if self.time_scale > MAX_TIME_SCALE {
            return Err(format!("--time-scale must be at most {}", MAX_TIME_SCALE));
        }

        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err("--failure-rate must be between 0.0 and 1.0".to_string());
        }

        if self.sims.is_empty() {
            return Err("--sims needs at least one simulation".to_string());
        }

        Ok(())
    }

    /// Seed to use (0 = pick one)
    pub fn effective_seed(&self) -> u64 {
        if self.seed == 0 {
            fastrand::u64(1..)
        } else {
            self.seed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["test"]);
        assert_eq!(args.sims, vec!["all"]);
        assert_eq!(args.pool_size, 3);
        assert_eq!(args.seed, 0);
        assert!((args.time_scale - 1.0).abs() < f64::EPSILON);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_sim_list() {
        let args = CliArgs::parse_from(["test", "-t", "race,hospital", "--sims", "api"]);
        assert_eq!(args.sims, vec!["race", "hospital", "api"]);
    }

    #[test]
    fn test_validation_pool_size() {
        let args = CliArgs::parse_from(["test", "--pool-size", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_time_scale() {
        let args = CliArgs::parse_from(["test", "--time-scale", "0"]);
        assert!(args.validate().is_err());
        let args = CliArgs::parse_from(["test", "--time-scale", "0.01"]);
        assert!(args.validate().is_ok());
        let args = CliArgs::parse_from(["test", "--time-scale", "1e300"]);
        assert!(args.validate().is_err());
        let args = CliArgs::parse_from(["test", "--time-scale", "1000"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_failure_rate() {
        let args = CliArgs::parse_from(["test", "--failure-rate", "1.5"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_explicit_seed_kept() {
        let args = CliArgs::parse_from(["test", "--seed", "7"]);
        assert_eq!(args.effective_seed(), 7);
        let args = CliArgs::parse_from(["test"]);
        assert_ne!(args.effective_seed(), 0);
    }

    #[test]
    fn test_hidden_child_flag() {
        let args = CliArgs::parse_from(["test", "--compute-square", "3"]);
        assert_eq!(args.compute_square, Some(3));
    }
}
