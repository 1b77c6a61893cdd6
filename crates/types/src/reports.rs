//! Report type definitions for operations

use crate::ReleasePolicy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which demo produced a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    /// Users sharing a single printer (capacity 1)
    Printer,
    /// Students sharing library tables
    Tables,
    /// Free-form contention run
    Contend,
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Printer => write!(f, "printer"),
            Self::Tables => write!(f, "tables"),
            Self::Contend => write!(f, "contend"),
        }
    }
}

/// Report for one run of workers against a fresh gate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier, also used as event correlation id
    pub run_id: Uuid,
    /// Demo that produced this run
    pub kind: RunKind,
    /// Gate capacity
    pub capacity: usize,
    /// Release policy the gate was built with
    pub policy: ReleasePolicy,
    /// Number of workers spawned
    pub workers: usize,
    /// Time each worker spends inside the critical section
    pub hold_ms: u64,
    /// Wall-clock time from first spawn to last join
    pub elapsed_ms: u64,
    /// Highest number of workers observed inside the critical section at once
    pub peak_holders: usize,
    /// Free slots once every worker was joined
    pub final_available: usize,
    /// Per-worker timeline, ordered by worker id
    pub records: Vec<WorkerRecord>,
}

impl RunReport {
    /// Workers that gave up waiting
    #[must_use]
    pub fn timed_out(&self) -> usize {
        self.records.iter().filter(|r| r.granted_at_ms.is_none()).count()
    }

    /// Workers that had to park before being granted a slot
    #[must_use]
    pub fn blocked(&self) -> usize {
        self.records.iter().filter(|r| r.waited).count()
    }
}

/// Timeline of one worker, in milliseconds since the run started
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Worker id, starting at 1
    pub worker: usize,
    /// Display name ("User1", "Student 4", ...)
    pub label: String,
    /// Whether the worker found the gate saturated on arrival
    pub waited: bool,
    /// When the slot was granted; `None` if the worker timed out
    pub granted_at_ms: Option<u64>,
    /// When the slot was given back
    pub released_at_ms: Option<u64>,
}

impl WorkerRecord {
    /// Time spent holding the slot
    #[must_use]
    pub fn held_ms(&self) -> Option<u64> {
        match (self.granted_at_ms, self.released_at_ms) {
            (Some(granted), Some(released)) => Some(released.saturating_sub(granted)),
            _ => None,
        }
    }
}
