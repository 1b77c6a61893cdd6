//! Scoped slot ownership

use semgate_errors::GateError;
use tracing::warn;

use crate::gate::{BoundedResourceGate, Grant, Release};

/// One slot of a [`BoundedResourceGate`], given back when dropped
///
/// Dropping during a panic still releases, so a critical section that
/// unwinds never leaks its slot.
#[derive(Debug)]
#[must_use = "dropping the permit releases the slot immediately"]
pub struct GatePermit<'a> {
    gate: &'a BoundedResourceGate,
    grant: Grant,
    released: bool,
}

impl<'a> GatePermit<'a> {
    pub(crate) fn new(gate: &'a BoundedResourceGate, grant: Grant) -> Self {
        Self {
            gate,
            grant,
            released: false,
        }
    }

    /// Whether the holder had to park before getting the slot
    #[must_use]
    pub fn waited(&self) -> bool {
        self.grant.waited
    }

    /// Free slots right after this permit was granted
    #[must_use]
    pub fn available_at_grant(&self) -> usize {
        self.grant.available
    }

    /// Give the slot back now and report what happened to it
    ///
    /// # Errors
    ///
    /// Propagates the gate's release error.
    pub fn release(mut self) -> Result<Release, GateError> {
        self.released = true;
        self.gate.release()
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.gate.release() {
            warn!(error = %e, "permit failed to release its slot");
        }
    }
}
