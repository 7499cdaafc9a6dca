//! Download simulator
//!
//! The same six files are "downloaded" three times: sequentially, with one
//! thread per file, and on a fixed pool. Shared stats are reset before each
//! mode; a comparison chart closes the run.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use tracing::debug;

use crate::config::SimConfig;
use crate::pool::{scaled, ExecutionMode, RunReport, Runner, TaskOutcome, Work, WorkContext, WorkItem};
use crate::report::{print_summary, Comparison};
use crate::sync::console::{BOLD, YELLOW};
use crate::sync::{Console, SharedStats};
use crate::utils::{Result, SimError};

/// (name, size in MB)
pub const FILES: [(&str, u64); 6] = [
    ("video_4K.mp4", 850),
    ("dataset_ml.zip", 420),
    ("backup_photos.tar", 310),
    ("music_album.zip", 180),
    ("document.pdf", 45),
    ("software_v2.exe", 220),
];

/// Simulated bandwidth per transfer
pub const SPEED_MB_S: f64 = 120.0;

/// Progress updates per file
pub const STEPS: u32 = 20;

/// Pause between modes
const MODE_GAP_SECS: f64 = 0.5;

/// All three runs and their comparison
#[derive(Debug, Clone)]
pub struct DownloadsResult {
    pub reports: Vec<RunReport>,
    pub comparison: Comparison,
}

/// Build the download items
///
/// Each file's bandwidth is `SPEED_MB_S` divided by a factor drawn from
/// U(0.8, 1.5).
pub fn download_items(config: &SimConfig) -> Vec<WorkItem> {
    let mut rng = config.rng();
    FILES
        .iter()
        .enumerate()
        .map(|(i, (name, size))| {
            let factor = 0.8 + rng.f64() * 0.7;
            let speed = SPEED_MB_S / factor;
            WorkItem::new(i, *name, *size, scaled(*size as f64 / speed, config.time_scale))
        })
        .collect()
}

/// Simulated download with stepped progress and optional random failure
pub struct DownloadWork {
    console: Arc<Console>,
    progress: MultiProgress,
    failure_rate: f64,
    rng: Mutex<fastrand::Rng>,
}

impl DownloadWork {
    pub fn new(config: &SimConfig, console: Arc<Console>) -> Self {
        let progress = if console.is_quiet() {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            console,
            progress,
            failure_rate: config.failure_rate,
            rng: Mutex::new(fastrand::Rng::with_seed(config.seed.wrapping_add(1))),
        }
    }

    fn progress_bar(&self, item: &WorkItem, ctx: &WorkContext) -> ProgressBar {
        let bar = self.progress.add(ProgressBar::new(u64::from(STEPS)));
        if let Ok(style) = ProgressStyle::default_bar()
            .template("  [{prefix}] {msg:<22} [{bar:30}] {percent:>3}%")
        {
            bar.set_style(style.progress_chars("█░ "));
        }
        bar.set_prefix(ctx.worker.clone());
        bar.set_message(item.name.chars().take(22).collect::<String>());
        bar
    }

    /// Write a worker line with the progress bars cleared
    fn worker_line(&self, slot: usize, text: String) {
        self.progress.suspend(|| self.console.worker_line(slot, text));
    }

    /// Step at which this transfer breaks, if it does
    fn failure_step(&self) -> Option<u32> {
        let mut rng = self.rng.lock();
        if rng.f64() < self.failure_rate {
            Some(rng.u32(1..=STEPS))
        } else {
            None
        }
    }
}

impl Work for DownloadWork {
    fn execute(&self, item: &WorkItem, ctx: &WorkContext) -> Result<()> {
        self.worker_line(
            ctx.slot,
            format!("  [{}] ▶ Starting: {} ({} MB)", ctx.worker, item.name, item.size),
        );

        let fails_at = self.failure_step();
        let bar = self.progress_bar(item, ctx);
        let start = Instant::now();
        let slice = item.duration / STEPS;

        for step in 1..=STEPS {
            thread::sleep(slice);
            if fails_at == Some(step) {
                bar.abandon_with_message(format!("{} ✗", item.name));
                return Err(SimError::task(
                    &item.name,
                    format!("connection reset at {}%", step * 100 / STEPS),
                ));
            }
            bar.set_position(u64::from(step));
        }
        bar.finish();

        let elapsed = start.elapsed();
        debug!(
            "{} done at {:.1} MB/s",
            item.name,
            item.size as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
        self.worker_line(
            ctx.slot,
            format!(
                "  [{}] {:<22} 100% ✓ ({:.2}s)",
                ctx.worker,
                item.name,
                elapsed.as_secs_f64()
            ),
        );
        Ok(())
    }
}

fn mode_banner(console: &Console, mode: ExecutionMode, files: usize) {
    let detail = match mode {
        ExecutionMode::Sequential => "Files are downloaded ONE AT A TIME".to_string(),
        ExecutionMode::ThreadPerTask => format!("One thread per file, {} threads", files),
        ExecutionMode::Pool { size } => format!("Pool of {} threads processing {} files", size, files),
    };
    let title = format!("MODE {}", mode);
    console.header('═', 60, &[title.as_str(), detail.as_str()]);
}

/// Run one mode over fresh shared stats
pub fn run_mode(
    runner: &Runner,
    items: &[WorkItem],
    mode: ExecutionMode,
    console: &Console,
) -> Result<RunReport> {
    mode_banner(console, mode, items.len());
    runner.stats().reset();

    let report = runner.run(items.to_vec(), mode)?;
    print_summary(console, &report, "MB");
    Ok(report)
}

pub fn run(config: &SimConfig, console: Arc<Console>) -> Result<DownloadsResult> {
    console.header(
        '═',
        60,
        &["🔀 CONCURRENT DOWNLOAD SIMULATOR", "threads · pool · lock"],
    );
    console.block([
        format!("  Files to download: {}", FILES.len()),
        console.paint(YELLOW, "\n  [!] Comparing: sequential vs threads vs pool..."),
    ]);
    super::pause(config, &console, "Press ENTER to start the demonstration...")?;

    let items = download_items(config);
    let stats: Arc<SharedStats<TaskOutcome>> = Arc::new(SharedStats::new());
    let work = DownloadWork::new(config, Arc::clone(&console));
    let runner = Runner::new(Arc::new(work), stats);

    let modes = [
        ExecutionMode::Sequential,
        ExecutionMode::ThreadPerTask,
        ExecutionMode::Pool {
            size: config.pool_size,
        },
    ];
    let gap = scaled(MODE_GAP_SECS, config.time_scale);

    let mut reports = Vec::with_capacity(modes.len());
    for mode in modes {
        reports.push(run_mode(&runner, &items, mode, &console)?);
        thread::sleep(gap);
    }

    let comparison = Comparison::from_reports(&reports);
    comparison.print(&console);
    console.block([
        console.paint(BOLD, "  💡 Concepts shown:"),
        "   • std::thread       → independent thread per task".to_string(),
        "   • Mutex             → critical section (stats and console)".to_string(),
        "   • WorkerPool        → reusable pool with bounded workers".to_string(),
        "   • mpsc channel      → results collected as they complete".to_string(),
        "   • JoinHandle::join  → wait for every worker".to_string(),
        String::new(),
    ]);

    Ok(DownloadsResult {
        reports,
        comparison,
    })
}

/// Sum of every item's simulated duration
pub fn total_duration(items: &[WorkItem]) -> Duration {
    items.iter().map(|i| i.duration).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimKind;

    #[test]
    fn test_download_items_use_speed_bounds() {
        let config = SimConfig::for_tests(SimKind::Downloads, 1.0);
        let items = download_items(&config);
        assert_eq!(items.len(), FILES.len());
        for item in &items {
            // duration = size * factor / speed, factor in [0.8, 1.5)
            let secs = item.duration.as_secs_f64();
            let min = item.size as f64 * 0.8 / SPEED_MB_S;
            let max = item.size as f64 * 1.5 / SPEED_MB_S;
            assert!(secs >= min - 1e-9 && secs <= max + 1e-9, "{} {}", item.name, secs);
        }
    }

    #[test]
    fn test_three_modes_same_totals() {
        let mut config = SimConfig::for_tests(SimKind::Downloads, 0.01);
        config.pool_size = 2;
        let result = run(&config, Arc::new(Console::silent())).unwrap();

        assert_eq!(result.reports.len(), 3);
        let expected: u64 = FILES.iter().map(|(_, s)| s).sum();
        for report in &result.reports {
            assert_eq!(report.outcomes.len(), FILES.len());
            assert_eq!(report.total_size(), expected);
        }
        assert_eq!(result.reports[0].peak_in_flight, 1);
        assert!(result.reports[2].peak_in_flight <= 2);
        assert_eq!(result.comparison.rows.len(), 3);
    }

    #[test]
    fn test_worker_lines_stay_whole_alongside_bars() {
        use crate::sync::MemoryWriter;

        let sink = MemoryWriter::new();
        let console = Arc::new(Console::with_writer(sink.clone(), false));
        let config = SimConfig::for_tests(SimKind::Downloads, 0.005);
        let items = download_items(&config);
        let runner = Runner::new(
            Arc::new(DownloadWork::new(&config, Arc::clone(&console))),
            Arc::new(SharedStats::new()),
        );

        let report = runner.run(items, ExecutionMode::Pool { size: 3 }).unwrap();
        assert_eq!(report.outcomes.len(), FILES.len());

        let text = sink.contents();
        for (name, size) in FILES {
            let starts: Vec<_> = text
                .lines()
                .filter(|l| l.contains(&format!("▶ Starting: {} ({} MB)", name, size)))
                .collect();
            assert_eq!(starts.len(), 1, "{}", name);
            assert!(starts[0].starts_with("  [pool-"));
            let done = text
                .lines()
                .filter(|l| l.contains(name) && l.contains("100% ✓"))
                .count();
            assert_eq!(done, 1, "{}", name);
        }
    }

    #[test]
    fn test_failures_are_excluded() {
        let mut config = SimConfig::for_tests(SimKind::Downloads, 0.005);
        config.failure_rate = 1.0;
        let console = Arc::new(Console::silent());
        let items = download_items(&config);
        let runner = Runner::new(
            Arc::new(DownloadWork::new(&config, Arc::clone(&console))),
            Arc::new(SharedStats::new()),
        );

        let report = run_mode(&runner, &items, ExecutionMode::Pool { size: 3 }, &console).unwrap();
        assert!(report.outcomes.is_empty());
        assert_eq!(report.failures.len(), FILES.len());
        assert!(report.failures[0].reason.contains("connection reset"));
        assert_eq!(runner.stats().total_size(), 0);
    }
}
