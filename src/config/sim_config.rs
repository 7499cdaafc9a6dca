//! Simulation configuration derived from CLI arguments

use std::fmt;
use std::path::PathBuf;

use super::cli::CliArgs;

/// Available simulations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimKind {
    /// Runners racing, finish order under a lock
    Race,
    /// Doctors gated on the director's signal
    Hospital,
    /// Sequential vs threads vs pool downloads
    Downloads,
    /// Three plain threaded downloads
    DownloadThreads,
    /// Async API calls on one thread
    Api,
    /// Squares computed in child processes
    Squares,
}

impl SimKind {
    pub const ALL: [SimKind; 6] = [
        SimKind::Race,
        SimKind::Hospital,
        SimKind::Downloads,
        SimKind::DownloadThreads,
        SimKind::Api,
        SimKind::Squares,
    ];

    /// Parse a simulation name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "race" | "runners" | "corredores" => Some(Self::Race),
            "hospital" | "shift" => Some(Self::Hospital),
            "downloads" | "download" | "compare" => Some(Self::Downloads),
            "download-threads" | "download_threads" | "threads" => Some(Self::DownloadThreads),
            "api" | "async" | "api-calls" | "api_calls" => Some(Self::Api),
            "squares" | "processes" | "multiprocessing" => Some(Self::Squares),
            _ => None,
        }
    }

    /// Parse a list of names; `all` expands to every simulation
    pub fn parse_list(names: &[String]) -> Result<Vec<Self>, String> {
        let mut kinds = Vec::new();
        for name in names {
            if name.trim().eq_ignore_ascii_case("all") {
                for kind in Self::ALL {
                    if !kinds.contains(&kind) {
                        kinds.push(kind);
                    }
                }
                continue;
            }
            let kind = Self::parse(name).ok_or_else(|| format!("Unknown simulation: {}", name))?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Race => "race",
            Self::Hospital => "hospital",
            Self::Downloads => "downloads",
            Self::DownloadThreads => "download-threads",
            Self::Api => "api",
            Self::Squares => "squares",
        }
    }
}

impl fmt::Display for SimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub sims: Vec<SimKind>,

    // Execution
    pub pool_size: usize,
    pub seed: u64,
    pub time_scale: f64,
    pub failure_rate: f64,

    // Output
    pub pause: bool,
    pub color: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub output_path: Option<PathBuf>,
}

impl SimConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        args.validate()?;

        Ok(Self {
            sims: SimKind::parse_list(&args.sims)?,
            pool_size: args.pool_size,
            seed: args.effective_seed(),
            time_scale: args.time_scale,
            failure_rate: args.failure_rate,
            pause: !args.no_pause && !args.quiet,
            color: !args.no_color,
            quiet: args.quiet,
            verbose: args.verbose,
            output_path: args.output.clone(),
        })
    }

    /// Defaults for a standalone program running a single simulation
    pub fn standalone(kind: SimKind) -> Self {
        Self {
            sims: vec![kind],
            ..Self::default()
        }
    }

    /// Fast, silent, deterministic settings for tests
    pub fn for_tests(kind: SimKind, time_scale: f64) -> Self {
        Self {
            sims: vec![kind],
            seed: 42,
            time_scale,
            pause: false,
            color: false,
            quiet: true,
            ..Self::default()
        }
    }

    /// Seeded RNG for simulated durations
    pub fn rng(&self) -> fastrand::Rng {
        fastrand::Rng::with_seed(self.seed)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sims: SimKind::ALL.to_vec(),
            pool_size: 3,
            seed: fastrand::u64(1..),
            time_scale: 1.0,
            failure_rate: 0.0,
            pause: true,
            color: true,
            quiet: false,
            verbose: false,
            output_path: None,
        }
    }
}
