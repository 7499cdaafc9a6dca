//! Plain threaded downloads: three files, one thread each

use std::sync::Arc;
use std::thread;

use crate::config::SimConfig;
use crate::pool::{scaled, ExecutionMode, RunReport, Runner, Work, WorkContext, WorkItem};
use crate::sync::{Console, SharedStats};
use crate::utils::Result;

pub const FILES: [&str; 3] = ["file1.zip", "file2.mp4", "file3.pdf"];

/// Whole-second duration bounds
const MIN_SECS: u64 = 2;
const MAX_SECS: u64 = 5;

struct TimedDownload {
    console: Arc<Console>,
}

impl Work for TimedDownload {
    fn execute(&self, item: &WorkItem, ctx: &WorkContext) -> Result<()> {
        self.console
            .worker_line(ctx.slot, format!("Starting download: {}", item.name));
        thread::sleep(item.duration);
        self.console.worker_line(
            ctx.slot,
            format!(
                "Download finished: {} in {:.1} seconds",
                item.name,
                item.duration.as_secs_f64()
            ),
        );
        Ok(())
    }
}

/// One item per file with a whole number of seconds in [2, 5]
pub fn items(config: &SimConfig) -> Vec<WorkItem> {
    let mut rng = config.rng();
    FILES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let secs = rng.u64(MIN_SECS..=MAX_SECS);
            WorkItem::new(i, *name, secs, scaled(secs as f64, config.time_scale))
        })
        .collect()
}

pub fn run(config: &SimConfig, console: Arc<Console>) -> Result<RunReport> {
    let work = TimedDownload {
        console: Arc::clone(&console),
    };
    let runner = Runner::new(Arc::new(work), Arc::new(SharedStats::new()));
    let report = runner.run(items(config), ExecutionMode::ThreadPerTask)?;

    console.line("All downloads finished.");
    Ok(report)
}
