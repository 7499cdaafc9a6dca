//! Hospital shift
//!
//! Doctors start first and block on the opening gate. A director thread
//! inspects the hospital, then opens the gate once, releasing every
//! doctor together. Each consultation is registered under the shared
//! registry's lock together with the running total.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::SimConfig;
use crate::pool::{scaled, ExecutionMode, RunReport, Runner, Work, WorkContext, WorkItem};
use crate::sync::{Console, Gate, SharedStats};
use crate::utils::{Result, SimError};

/// A doctor on shift
#[derive(Debug, Clone, Copy)]
pub struct Doctor {
    pub name: &'static str,
    pub specialty: &'static str,
    pub emoji: &'static str,
}

pub const DOCTORS: [Doctor; 4] = [
    Doctor { name: "Dr. García", specialty: "Cardiology", emoji: "👩‍⚕️" },
    Doctor { name: "Dr. Ramírez", specialty: "Pediatrics", emoji: "👨‍⚕️" },
    Doctor { name: "Dr. Torres", specialty: "Neurology", emoji: "👩‍⚕️" },
    Doctor { name: "Dr. Mendoza", specialty: "Traumatology", emoji: "👨‍⚕️" },
];

pub const PATIENTS_PER_DOCTOR: u64 = 3;

const CONSULT_MIN_SECS: f64 = 0.5;
const CONSULT_MAX_SECS: f64 = 1.5;
const INSPECTION_SECS: f64 = 2.0;
/// Head start given to the doctors before the director begins
const DOCTORS_HEAD_START_SECS: f64 = 0.3;

/// One registered consultation
#[derive(Debug, Clone)]
pub struct Consultation {
    pub doctor: String,
    pub patient: u64,
    /// Time since the shift started
    pub at: Duration,
}

/// Outcome of a shift
#[derive(Debug, Clone)]
pub struct ShiftResult {
    pub registry: Vec<Consultation>,
    pub gate_open: bool,
    /// When the director opened the gate, since shift start
    pub opened_at: Duration,
    pub report: RunReport,
}

struct DoctorWork {
    gate: Arc<Gate>,
    registry: Arc<SharedStats<Consultation>>,
    /// Consultation durations per doctor, indexed by item id
    consults: Vec<Vec<Duration>>,
    shift_start: Instant,
    console: Arc<Console>,
}

impl Work for DoctorWork {
    fn execute(&self, item: &WorkItem, ctx: &WorkContext) -> Result<()> {
        let doctor = DOCTORS[item.id % DOCTORS.len()];
        self.console.worker_line(
            ctx.slot,
            format!("  {} {} ({}): waiting for opening...", doctor.emoji, doctor.name, doctor.specialty),
        );

        self.gate.wait();

        self.console.worker_line(
            ctx.slot,
            format!("  {} {}: got the signal! Starting consultations.", doctor.emoji, doctor.name),
        );

        let consults = &self.consults[item.id];
        for (i, duration) in consults.iter().enumerate() {
            thread::sleep(*duration);

            let patient = i as u64 + 1;
            let entry = Consultation {
                doctor: doctor.name.to_string(),
                patient,
                at: self.shift_start.elapsed(),
            };
            let console = &self.console;
            self.registry.record_with(entry, 1, |total, _| {
                console.worker_line(
                    ctx.slot,
                    format!(
                        "  {} {}: saw patient {}/{} ({:.1}s)  | Total seen today: {}",
                        doctor.emoji,
                        doctor.name,
                        patient,
                        consults.len(),
                        duration.as_secs_f64(),
                        total
                    ),
                );
            });
        }

        self.console
            .line(format!("\n  {} {}: shift complete ✓\n", doctor.emoji, doctor.name));
        Ok(())
    }
}

/// Draw consultation durations for every doctor
pub fn consult_plan(config: &SimConfig, doctors: usize, patients: u64) -> Vec<Vec<Duration>> {
    let mut rng = config.rng();
    (0..doctors)
        .map(|_| {
            (0..patients)
                .map(|_| {
                    let secs = CONSULT_MIN_SECS + rng.f64() * (CONSULT_MAX_SECS - CONSULT_MIN_SECS);
                    scaled(secs, config.time_scale)
                })
                .collect()
        })
        .collect()
}

pub fn run(config: &SimConfig, console: Arc<Console>) -> Result<ShiftResult> {
    console.header('=', 55, &["🏥 HOSPITAL SIMULATOR — one-shot gate"]);
    console.block([
        String::new(),
        format!("  Doctors available   : {}", DOCTORS.len()),
        format!("  Patients per doctor : {}", PATIENTS_PER_DOCTOR),
        format!(
            "  Total consultations : {}",
            DOCTORS.len() as u64 * PATIENTS_PER_DOCTOR
        ),
        "\n  How it works".to_string(),
        "  → Every doctor (thread) blocks on the gate".to_string(),
        "  → The director opens it and releases them all\n".to_string(),
    ]);
    super::pause(config, &console, "Press ENTER to open the hospital... 🚪")?;

    let gate = Arc::new(Gate::new());
    let registry = Arc::new(SharedStats::new());
    let shift_start = Instant::now();

    let plan = consult_plan(config, DOCTORS.len(), PATIENTS_PER_DOCTOR);
    let items: Vec<WorkItem> = DOCTORS
        .iter()
        .enumerate()
        .map(|(i, d)| WorkItem::new(i, d.name, PATIENTS_PER_DOCTOR, plan[i].iter().sum()))
        .collect();

    let work = DoctorWork {
        gate: Arc::clone(&gate),
        registry: Arc::clone(&registry),
        consults: plan,
        shift_start,
        console: Arc::clone(&console),
    };

    let director = {
        let gate = Arc::clone(&gate);
        let console = Arc::clone(&console);
        let head_start = scaled(DOCTORS_HEAD_START_SECS, config.time_scale);
        let inspection = scaled(INSPECTION_SECS, config.time_scale);
        thread::Builder::new()
            .name("director".to_string())
            .spawn(move || {
                thread::sleep(head_start);
                console.line("  🏢 Director: checking that everything is ready...");
                thread::sleep(inspection);
                console.line("\n  🏢 Director: HOSPITAL OPEN! Doctors may start.\n");
                let opened_at = shift_start.elapsed();
                gate.open();
                debug!("gate opened with {} doctors waiting", gate.waiting());
                opened_at
            })
            .map_err(|e| SimError::Worker(format!("failed to spawn director: {}", e)))?
    };

    let runner = Runner::new(Arc::new(work), Arc::new(SharedStats::new()));
    let run_result = runner.run(items, ExecutionMode::ThreadPerTask);

    // The director must be joined even if the doctors' run failed.
    let opened_at = director
        .join()
        .map_err(|_| SimError::Worker("director thread panicked".to_string()))?;
    let mut report = run_result?;
    report.label = "HOSPITAL (thread per doctor)".to_string();

    let registry = registry.snapshot().log;
    let gate_open = gate.is_open();

    console.block([
        "=".repeat(55),
        "   📋 SHIFT SUMMARY".to_string(),
        "=".repeat(55),
        format!("  Patients seen in total: {}", registry.len()),
        format!(
            "  Gate state at close: {}",
            if gate_open { "🟢 open" } else { "🔴 closed" }
        ),
        "=".repeat(55),
    ]);

    Ok(ShiftResult {
        registry,
        gate_open,
        opened_at,
        report,
    })
}
