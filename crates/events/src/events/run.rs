use serde::{Deserialize, Serialize};
use semgate_types::{RunKind, Uuid};

/// What a worker's release did with its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ReleaseOutcome {
    /// Slot went back to the pool, leaving `available` free
    Freed { available: usize },
    /// Slot went straight to the oldest waiter
    HandedOff,
    /// Release had nothing to give back
    Clamped,
}

/// Worker-level events of a demo run
///
/// Every event carries the run id so concurrent runs can be told apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunEvent {
    /// Workers are about to be spawned
    Started {
        run_id: Uuid,
        kind: RunKind,
        capacity: usize,
        workers: usize,
        hold_ms: u64,
    },

    /// A worker joined the queue because every slot was taken
    WorkerWaiting {
        run_id: Uuid,
        kind: RunKind,
        worker: usize,
        label: String,
    },

    /// A worker entered the critical section
    WorkerGranted {
        run_id: Uuid,
        kind: RunKind,
        worker: usize,
        label: String,
        available: usize,
        waited: bool,
    },

    /// A worker left the critical section; sent before its slot is returned
    WorkerReleased {
        run_id: Uuid,
        kind: RunKind,
        worker: usize,
        label: String,
    },

    /// The gate took back a worker's slot
    SlotReturned {
        run_id: Uuid,
        kind: RunKind,
        worker: usize,
        label: String,
        outcome: ReleaseOutcome,
    },

    /// A worker gave up waiting
    WorkerTimedOut {
        run_id: Uuid,
        kind: RunKind,
        worker: usize,
        label: String,
        waited_ms: u64,
    },

    /// Every worker was joined
    Completed {
        run_id: Uuid,
        kind: RunKind,
        elapsed_ms: u64,
        peak_holders: usize,
    },

    /// The run could not finish
    Failed {
        run_id: Uuid,
        kind: RunKind,
        failure: super::FailureContext,
    },
}

impl RunEvent {
    /// Run this event belongs to
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::Started { run_id, .. }
            | Self::WorkerWaiting { run_id, .. }
            | Self::WorkerGranted { run_id, .. }
            | Self::WorkerReleased { run_id, .. }
            | Self::SlotReturned { run_id, .. }
            | Self::WorkerTimedOut { run_id, .. }
            | Self::Completed { run_id, .. }
            | Self::Failed { run_id, .. } => *run_id,
        }
    }
}
