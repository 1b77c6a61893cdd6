use serde::{Deserialize, Serialize};
use semgate_types::{GateSnapshot, ReleasePolicy};

/// Gate lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GateEvent {
    /// A gate was constructed
    Created {
        capacity: usize,
        policy: ReleasePolicy,
    },

    /// A gate was torn down
    Destroyed { capacity: usize },

    /// Teardown was refused because the gate was still in use
    TeardownRefused { snapshot: GateSnapshot },
}
