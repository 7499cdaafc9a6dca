//! Async API calls on a single-threaded runtime

use std::sync::Arc;

use crate::config::SimConfig;
use crate::pool::{run_cooperative, scaled, RunReport, WorkItem};
use crate::sync::Console;
use crate::utils::Result;

pub const SERVICES: [&str; 3] = ["Service 1", "Service 2", "Service 3"];

const MIN_SECS: u64 = 1;
const MAX_SECS: u64 = 4;

/// One call per service with a whole number of seconds in [1, 4]
pub fn calls(config: &SimConfig) -> Vec<WorkItem> {
    let mut rng = config.rng();
    SERVICES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let secs = rng.u64(MIN_SECS..=MAX_SECS);
            WorkItem::new(i, *name, 1, scaled(secs as f64, config.time_scale))
        })
        .collect()
}

pub fn run(config: &SimConfig, console: Arc<Console>) -> Result<RunReport> {
    run_cooperative(calls(config), console)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimKind;
    use std::time::Duration;

    #[test]
    fn test_calls_within_bounds() {
        let config = SimConfig::for_tests(SimKind::Api, 1.0);
        for call in calls(&config) {
            assert!(call.duration >= Duration::from_secs(1));
            assert!(call.duration <= Duration::from_secs(4));
        }
    }

    #[test]
    fn test_all_services_answer() {
        let config = SimConfig::for_tests(SimKind::Api, 0.01);
        let report = run(&config, Arc::new(Console::silent())).unwrap();
        let mut names: Vec<_> = report.outcomes.iter().map(|o| o.name.clone()).collect();
        names.sort();
        assert_eq!(names, SERVICES.to_vec());
    }
}
