//! Runners race
//!
//! Every runner is its own thread. Steps print as they happen; crossing the
//! finish line takes the next position from the shared finish log inside
//! its lock, so no two runners can claim the same place.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::SimConfig;
use crate::pool::{scaled, ExecutionMode, RunReport, Runner, Work, WorkContext, WorkItem};
use crate::sync::{Console, SharedStats};
use crate::utils::Result;

pub const RUNNERS: [&str; 5] = ["Ana", "Luis", "Marta", "Carlos", "Sofía"];

/// Steps to the finish line
pub const DISTANCE: u32 = 10;

/// Step time bounds in seconds
const STEP_MIN_SECS: f64 = 0.1;
const STEP_MAX_SECS: f64 = 0.4;

/// Average step time used for the sequential estimate
const AVG_STEP_SECS: f64 = 0.25;

/// Outcome of a race
#[derive(Debug, Clone)]
pub struct RaceResult {
    /// Runner names in finishing order
    pub podium: Vec<String>,
    pub report: RunReport,
    /// What the race would have taken one runner at a time
    pub estimated_sequential: Duration,
}

struct RaceWork {
    /// Step durations per runner, indexed by item id
    steps: Vec<Vec<Duration>>,
    finish_line: Arc<SharedStats<String>>,
    console: Arc<Console>,
}

impl Work for RaceWork {
    fn execute(&self, item: &WorkItem, ctx: &WorkContext) -> Result<()> {
        let steps = &self.steps[item.id];
        for (n, step) in steps.iter().enumerate() {
            thread::sleep(*step);
            self.console
                .worker_line(ctx.slot, format!("  🧍 {}  step {}/{}", item.name, n + 1, steps.len()));
        }

        let console = &self.console;
        self.finish_line.record_with(item.name.clone(), 1, |position, name| {
            console.line(format!("\n  ✅ {} finished in PLACE #{}\n", name, position));
        });
        Ok(())
    }
}

/// Draw per-step durations for every runner
pub fn step_plan(config: &SimConfig, runners: usize, distance: u32) -> Vec<Vec<Duration>> {
    let mut rng = config.rng();
    (0..runners)
        .map(|_| {
            (0..distance)
                .map(|_| {
                    let secs = STEP_MIN_SECS + rng.f64() * (STEP_MAX_SECS - STEP_MIN_SECS);
                    scaled(secs, config.time_scale)
                })
                .collect()
        })
        .collect()
}

fn medal(position: usize) -> String {
    match position {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{:>2}.", n),
    }
}

pub fn run(config: &SimConfig, console: Arc<Console>) -> Result<RaceResult> {
    console.header(
        '=',
        50,
        &["🏁 RACE — concurrent programming"],
    );
    console.block([
        String::new(),
        format!("  Runners  : {}", RUNNERS.len()),
        format!("  Distance : {} steps", DISTANCE),
        "  Each one runs in its own THREAD (in parallel)".to_string(),
    ]);
    super::pause(config, &console, "Press ENTER to start the race... 🚦")?;

    let plan = step_plan(config, RUNNERS.len(), DISTANCE);
    let items: Vec<WorkItem> = RUNNERS
        .iter()
        .enumerate()
        .map(|(i, name)| WorkItem::new(i, *name, u64::from(DISTANCE), plan[i].iter().sum()))
        .collect();

    let finish_line = Arc::new(SharedStats::new());
    let work = RaceWork {
        steps: plan,
        finish_line: Arc::clone(&finish_line),
        console: Arc::clone(&console),
    };

    console.line("  GO! 🏃‍♂️🏃‍♀️\n");
    let runner = Runner::new(Arc::new(work), Arc::new(SharedStats::new()));
    let mut report = runner.run(items, ExecutionMode::ThreadPerTask)?;
    report.label = "RACE (thread per runner)".to_string();

    let podium = finish_line.snapshot().log;
    let estimated_sequential = scaled(
        f64::from(DISTANCE) * AVG_STEP_SECS * RUNNERS.len() as f64,
        config.time_scale,
    );

    let mut lines = vec![
        "=".repeat(50),
        "   🏆 FINAL RESULTS".to_string(),
        "=".repeat(50),
    ];
    for (i, name) in podium.iter().enumerate() {
        lines.push(format!("  {}  {}", medal(i + 1), name));
    }
    lines.push(format!(
        "\n  Total race time: {:.2}s",
        report.elapsed.as_secs_f64()
    ));
    lines.push(format!(
        "\n  (Without concurrency it would have taken ~{:.1}s)",
        estimated_sequential.as_secs_f64()
    ));
    lines.push("=".repeat(50));
    console.block(lines);

    Ok(RaceResult {
        podium,
        report,
        estimated_sequential,
    })
}
