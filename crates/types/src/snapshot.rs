//! Point-in-time view of a gate

use serde::{Deserialize, Serialize};

/// Consistent copy of a gate's counters, taken under the gate's lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSnapshot {
    /// Maximum number of concurrent holders
    pub capacity: usize,
    /// Free slots
    pub available: usize,
    /// Callers between a successful acquire and its release
    pub holders: usize,
    /// Callers parked in acquire
    pub waiters: usize,
}

impl GateSnapshot {
    /// True when nobody holds or waits for a slot
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.holders == 0 && self.waiters == 0
    }

    /// True when every slot is taken
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.available == 0
    }
}
