//! Run summaries and mode comparison

use hdrhistogram::Histogram;

use crate::pool::RunReport;
use crate::sync::console::{BOLD, CYAN, GREEN, RED, WHITE, YELLOW};
use crate::sync::Console;

/// Width of the comparison bars
const BAR_WIDTH: usize = 40;

/// Per-task latency histogram in microseconds
pub fn latency_histogram(report: &RunReport) -> Histogram<u64> {
    let mut histogram =
        Histogram::new_with_bounds(1, 3_600_000_000, 3).expect("Failed to create histogram");
    for outcome in &report.outcomes {
        let us = (outcome.elapsed.as_micros() as u64).clamp(1, 3_600_000_000);
        histogram.record(us).ok();
    }
    histogram
}

/// Percentile of per-task time in seconds
pub fn percentile_secs(histogram: &Histogram<u64>, p: f64) -> f64 {
    histogram.value_at_percentile(p) as f64 / 1_000_000.0
}

/// Print the summary block for one run
///
/// `unit` names the size unit ("MB", "patients", ...).
pub fn print_summary(console: &Console, report: &RunReport, unit: &str) {
    let rule = "─".repeat(60);
    let mut lines = vec![
        String::new(),
        console.paint(&format!("{}{}", BOLD, WHITE), &rule),
        console.paint(
            &format!("{}{}", BOLD, WHITE),
            &format!("  ✅ SUMMARY — {}", report.label),
        ),
        console.paint(&format!("{}{}", BOLD, WHITE), &rule),
        format!("  Completed           : {}", report.outcomes.len()),
        format!(
            "  Total transferred   : {} {}",
            format_count(report.total_size()),
            unit
        ),
        format!(
            "  Total time          : {}",
            console.paint(BOLD, &format!("{:.2}s", report.elapsed.as_secs_f64()))
        ),
        format!(
            "  Average throughput  : {:.1} {}/s",
            report.throughput(),
            unit
        ),
        format!("  Peak in flight      : {}", report.peak_in_flight),
    ];

    if !report.outcomes.is_empty() {
        let histogram = latency_histogram(report);
        lines.push(format!(
            "  Per-task time (s)   : p50={:.2} p95={:.2} max={:.2}",
            percentile_secs(&histogram, 50.0),
            percentile_secs(&histogram, 95.0),
            histogram.max() as f64 / 1_000_000.0
        ));
    }

    if !report.failures.is_empty() {
        let names: Vec<_> = report.failures.iter().map(|f| f.name.as_str()).collect();
        lines.push(console.paint(
            RED,
            &format!(
                "  Failed              : {} ({})",
                report.failures.len(),
                names.join(", ")
            ),
        ));
    }

    console.block(lines);
}

/// One row of the comparison chart
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub label: String,
    pub secs: f64,
    /// Bar length in characters
    pub bar_len: usize,
    /// Baseline time divided by this row's time
    pub speedup: f64,
}

/// Wall-clock comparison of several runs against the first one
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    /// Build from `(label, seconds)` pairs; the first pair is the baseline
    pub fn new(entries: &[(String, f64)]) -> Self {
        let max_t = entries.iter().map(|(_, t)| *t).fold(0.0_f64, f64::max);
        let baseline = entries.first().map(|(_, t)| *t).unwrap_or(0.0);

        let rows = entries
            .iter()
            .map(|(label, secs)| ComparisonRow {
                label: label.clone(),
                secs: *secs,
                bar_len: if max_t > 0.0 {
                    ((secs / max_t) * BAR_WIDTH as f64) as usize
                } else {
                    0
                },
                speedup: if *secs > 0.0 { baseline / secs } else { 0.0 },
            })
            .collect();

        Self { rows }
    }

    /// Build from finished runs
    pub fn from_reports(reports: &[RunReport]) -> Self {
        let entries: Vec<_> = reports
            .iter()
            .map(|r| (r.label.clone(), r.elapsed.as_secs_f64()))
            .collect();
        Self::new(&entries)
    }

    pub fn print(&self, console: &Console) {
        const ROW_COLORS: [&str; 4] = [RED, GREEN, YELLOW, CYAN];

        let rule = "═".repeat(60);
        let mut lines = vec![
            String::new(),
            console.paint(&format!("{}{}", BOLD, WHITE), &rule),
            console.paint(&format!("{}{}", BOLD, WHITE), "  📊 PERFORMANCE COMPARISON"),
            console.paint(&format!("{}{}", BOLD, WHITE), &rule),
        ];
        for (i, row) in self.rows.iter().enumerate() {
            let bar = "█".repeat(row.bar_len);
            lines.push(console.paint(
                ROW_COLORS[i % ROW_COLORS.len()],
                &format!(
                    "  {:<22} {:<width$} {:.2}s  (×{:.1})",
                    row.label,
                    bar,
                    row.secs,
                    row.speedup,
                    width = BAR_WIDTH
                ),
            ));
        }
        lines.push(String::new());
        console.block(lines);
    }
}

/// Format a count with thousands separators
pub fn format_count(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}
