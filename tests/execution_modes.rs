//! Timing and bookkeeping properties of the three execution modes

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use conc_sims::pool::{ExecutionMode, Runner, SleepWork, Work, WorkContext, WorkItem};
use conc_sims::sims::downloads::total_duration;
use conc_sims::sync::SharedStats;
use conc_sims::utils::Result;

fn items(n: usize, millis: u64) -> Vec<WorkItem> {
    (0..n)
        .map(|i| WorkItem::new(i, format!("task-{}", i), i as u64 + 1, Duration::from_millis(millis)))
        .collect()
}

fn runner() -> Runner {
    Runner::new(Arc::new(SleepWork::new(2)), Arc::new(SharedStats::new()))
}

#[test]
fn sequential_takes_the_sum_of_durations() {
    let batch = items(4, 50);
    let sum = total_duration(&batch);

    let report = runner().run(batch, ExecutionMode::Sequential).unwrap();

    assert_eq!(report.outcomes.len(), 4);
    assert!(report.elapsed >= sum);
    assert!(report.elapsed < sum + Duration::from_millis(150));
}

#[test]
fn thread_per_task_takes_the_longest_duration() {
    let report = runner()
        .run(items(6, 80), ExecutionMode::ThreadPerTask)
        .unwrap();

    assert_eq!(report.outcomes.len(), 6);
    assert!(report.elapsed >= Duration::from_millis(80));
    assert!(report.elapsed < Duration::from_millis(300));
    assert_eq!(report.peak_in_flight, 6);
}

#[test]
fn pool_never_exceeds_its_size() {
    let live = Arc::new(AtomicUsize::new(0));
    let worst = Arc::new(AtomicUsize::new(0));
    let work: Arc<dyn Work> = {
        let live = Arc::clone(&live);
        let worst = Arc::clone(&worst);
        Arc::new(move |item: &WorkItem, _: &WorkContext| -> Result<()> {
            let now = live.fetch_add(1, Ordering::SeqCst) + 1;
            worst.fetch_max(now, Ordering::SeqCst);
            thread::sleep(item.duration);
            live.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        })
    };

    let runner = Runner::new(work, Arc::new(SharedStats::new()));
    let report = runner.run(items(7, 40), ExecutionMode::Pool { size: 3 }).unwrap();

    assert_eq!(report.outcomes.len(), 7);
    assert!(worst.load(Ordering::SeqCst) <= 3);
    assert!(report.peak_in_flight <= 3);
    // 7 tasks on 3 workers need at least 3 rounds
    assert!(report.elapsed >= Duration::from_millis(120));
}

#[test]
fn shared_counters_match_item_sizes_for_any_worker_count() {
    for workers in [1, 2, 5, 16] {
        let stats = Arc::new(SharedStats::new());
        let runner = Runner::new(Arc::new(SleepWork::default()), Arc::clone(&stats));
        let batch = items(40, 1);
        let expected: u64 = batch.iter().map(|i| i.size).sum();

        let report = runner.run(batch, ExecutionMode::Pool { size: workers }).unwrap();

        let snap = stats.snapshot();
        assert_eq!(snap.completed, 40, "workers={}", workers);
        assert_eq!(snap.total_size, expected, "workers={}", workers);
        assert_eq!(snap.log.len(), 40);
        assert_eq!(report.total_size(), expected);
    }
}

#[test]
fn result_log_is_in_completion_order() {
    let batch: Vec<WorkItem> = [90u64, 10, 50]
        .iter()
        .enumerate()
        .map(|(i, ms)| WorkItem::new(i, format!("t{}", i), 1, Duration::from_millis(*ms)))
        .collect();
    let stats = Arc::new(SharedStats::new());
    let runner = Runner::new(Arc::new(SleepWork::default()), Arc::clone(&stats));

    let report = runner.run(batch, ExecutionMode::ThreadPerTask).unwrap();

    let logged: Vec<_> = stats.snapshot().log.iter().map(|o| o.id).collect();
    assert_eq!(logged, vec![1, 2, 0]);
    let reported: Vec<_> = report.outcomes.iter().map(|o| o.id).collect();
    assert_eq!(reported, vec![1, 2, 0]);
}
