//! Worker harness shared by every demo
//!
//! A run builds a fresh gate, spawns one scoped thread per worker, and
//! records when each worker got in and out. The gate is destroyed once
//! every worker has been joined.

use crate::OpsCtx;
use semgate_errors::{Error, GateError, OpsError};
use semgate_events::{EventEmitter, FailureContext, GateEvent, ReleaseOutcome, RunEvent};
use semgate_resources::{BoundedResourceGate, Release};
use semgate_types::{RunKind, RunReport, Uuid, WorkerRecord};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything needed to start a run
#[derive(Debug, Clone)]
pub(crate) struct RunPlan {
    pub kind: RunKind,
    pub capacity: usize,
    pub labels: Vec<String>,
    pub hold: Duration,
    pub timeout: Option<Duration>,
}

/// Live count of workers inside the critical section
#[derive(Debug, Default)]
struct Occupancy {
    inside: AtomicUsize,
    peak: AtomicUsize,
}

impl Occupancy {
    fn enter(&self) -> usize {
        let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        now
    }

    fn leave(&self) {
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Per-run values every worker thread reads
struct WorkerEnv<'a> {
    ctx: &'a OpsCtx,
    gate: &'a BoundedResourceGate,
    occupancy: &'a Occupancy,
    run_id: Uuid,
    kind: RunKind,
    hold: Duration,
    timeout: Option<Duration>,
    started: Instant,
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn release_outcome(release: Release) -> ReleaseOutcome {
    match release {
        Release::Freed { available } => ReleaseOutcome::Freed { available },
        Release::HandedOff => ReleaseOutcome::HandedOff,
        Release::Clamped => ReleaseOutcome::Clamped,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run every worker in `plan` against a fresh gate and report the timeline
///
/// # Errors
///
/// Returns an error if the gate cannot be built, a worker fails or panics,
/// or the gate does not end the run with every slot free.
pub(crate) fn execute(ctx: &OpsCtx, plan: &RunPlan) -> Result<RunReport, Error> {
    let run_id = Uuid::new_v4();
    let policy = ctx.config.gate.release_policy;

    let gate = BoundedResourceGate::with_policy(plan.capacity, policy)?;
    ctx.emit_gate(GateEvent::Created {
        capacity: plan.capacity,
        policy,
    });

    info!(
        %run_id,
        kind = %plan.kind,
        capacity = plan.capacity,
        workers = plan.labels.len(),
        "starting run"
    );
    ctx.emit_run(RunEvent::Started {
        run_id,
        kind: plan.kind,
        capacity: plan.capacity,
        workers: plan.labels.len(),
        hold_ms: millis(plan.hold),
    });

    match run_to_completion(ctx, plan, &gate, run_id) {
        Ok(report) => {
            ctx.emit_run(RunEvent::Completed {
                run_id,
                kind: plan.kind,
                elapsed_ms: report.elapsed_ms,
                peak_holders: report.peak_holders,
            });
            info!(%run_id, elapsed_ms = report.elapsed_ms, peak = report.peak_holders, "run completed");
            Ok(report)
        }
        Err(e) => {
            warn!(%run_id, error = %e, "run failed");
            ctx.emit_run(RunEvent::Failed {
                run_id,
                kind: plan.kind,
                failure: FailureContext::from_error(&e),
            });
            Err(e)
        }
    }
}

fn run_to_completion(
    ctx: &OpsCtx,
    plan: &RunPlan,
    gate: &BoundedResourceGate,
    run_id: Uuid,
) -> Result<RunReport, Error> {
    let occupancy = Occupancy::default();
    let env = WorkerEnv {
        ctx,
        gate,
        occupancy: &occupancy,
        run_id,
        kind: plan.kind,
        hold: plan.hold,
        timeout: plan.timeout,
        started: Instant::now(),
    };

    let joined: Vec<_> = thread::scope(|scope| {
        let env = &env;
        let handles: Vec<_> = plan
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| scope.spawn(move || run_worker(env, index + 1, label)))
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| (index + 1, handle.join()))
            .collect::<Vec<_>>()
    });
    let elapsed_ms = millis(env.started.elapsed());

    let mut records = Vec::with_capacity(joined.len());
    for (worker, result) in joined {
        match result {
            Ok(record) => records.push(record?),
            Err(payload) => {
                return Err(OpsError::WorkerPanicked {
                    worker,
                    message: panic_message(payload.as_ref()),
                }
                .into())
            }
        }
    }

    let final_available = gate.available();
    if final_available != gate.capacity() {
        return Err(OpsError::ConservationViolated {
            available: final_available,
            capacity: gate.capacity(),
        }
        .into());
    }

    if let Err(e) = gate.destroy() {
        ctx.emit_gate(GateEvent::TeardownRefused {
            snapshot: gate.snapshot(),
        });
        return Err(e.into());
    }
    ctx.emit_gate(GateEvent::Destroyed {
        capacity: gate.capacity(),
    });

    Ok(RunReport {
        run_id,
        kind: plan.kind,
        capacity: plan.capacity,
        policy: gate.policy(),
        workers: plan.labels.len(),
        hold_ms: millis(plan.hold),
        elapsed_ms,
        peak_holders: occupancy.peak(),
        final_available,
        records,
    })
}

fn run_worker(env: &WorkerEnv<'_>, worker: usize, label: &str) -> Result<WorkerRecord, GateError> {
    let mut record = WorkerRecord {
        worker,
        label: label.to_string(),
        waited: false,
        granted_at_ms: None,
        released_at_ms: None,
    };

    let attempt = env.gate.permit_with(env.timeout, || {
        env.ctx.emit_run(RunEvent::WorkerWaiting {
            run_id: env.run_id,
            kind: env.kind,
            worker,
            label: label.to_string(),
        });
        debug!(worker, label, "waiting for a slot");
    });
    let permit = match attempt {
        Ok(permit) => permit,
        Err(GateError::Timeout { waited_ms }) => {
            record.waited = true;
            env.ctx.emit_run(RunEvent::WorkerTimedOut {
                run_id: env.run_id,
                kind: env.kind,
                worker,
                label: label.to_string(),
                waited_ms,
            });
            debug!(worker, label, waited_ms, "gave up waiting");
            return Ok(record);
        }
        Err(e) => return Err(e),
    };
    record.waited = permit.waited();

    let inside = env.occupancy.enter();
    assert!(
        inside <= env.gate.capacity(),
        "{inside} workers inside a gate of capacity {}",
        env.gate.capacity()
    );
    record.granted_at_ms = Some(millis(env.started.elapsed()));
    env.ctx.emit_run(RunEvent::WorkerGranted {
        run_id: env.run_id,
        kind: env.kind,
        worker,
        label: label.to_string(),
        available: permit.available_at_grant(),
        waited: record.waited,
    });

    thread::sleep(env.hold);

    // Reported before the slot goes back so the next holder is announced after us.
    env.occupancy.leave();
    record.released_at_ms = Some(millis(env.started.elapsed()));
    env.ctx.emit_run(RunEvent::WorkerReleased {
        run_id: env.run_id,
        kind: env.kind,
        worker,
        label: label.to_string(),
    });

    let release = permit.release()?;
    env.ctx.emit_run(RunEvent::SlotReturned {
        run_id: env.run_id,
        kind: env.kind,
        worker,
        label: label.to_string(),
        outcome: release_outcome(release),
    });

    Ok(record)
}
