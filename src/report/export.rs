//! JSON export of run reports

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config::SimKind;
use crate::pool::RunReport;
use crate::utils::Result;

/// Runs produced by one simulation
#[derive(Debug, Clone)]
pub struct SimRuns {
    pub sim: SimKind,
    pub reports: Vec<RunReport>,
}

/// JSON value for a single run
pub fn report_to_json(report: &RunReport) -> Result<serde_json::Value> {
    Ok(serde_json::json!({
        "label": report.label,
        "elapsed_secs": report.elapsed.as_secs_f64(),
        "completed": report.outcomes.len(),
        "failed": report.failures.len(),
        "total_size": report.total_size(),
        "throughput": report.throughput(),
        "peak_in_flight": report.peak_in_flight,
        "outcomes": serde_json::to_value(&report.outcomes)?,
        "failures": serde_json::to_value(&report.failures)?,
    }))
}

/// JSON document for every simulation that ran
pub fn runs_to_json(seed: u64, runs: &[SimRuns]) -> Result<serde_json::Value> {
    let mut sims = Vec::with_capacity(runs.len());
    for run in runs {
        let reports = run
            .reports
            .iter()
            .map(report_to_json)
            .collect::<Result<Vec<_>>>()?;
        sims.push(serde_json::json!({
            "sim": run.sim.as_str(),
            "runs": reports,
        }));
    }

    Ok(serde_json::json!({
        "seed": seed,
        "simulations": sims,
    }))
}

/// Write every report to `path` as pretty JSON
pub fn write_json_file(path: &Path, seed: u64, runs: &[SimRuns]) -> Result<()> {
    let json = runs_to_json(seed, runs)?;
    let mut file = File::create(path)?;
    writeln!(file, "{}", serde_json::to_string_pretty(&json)?)?;
    Ok(())
}
