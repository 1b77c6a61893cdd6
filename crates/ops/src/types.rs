//! Types for operations and results

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request for a free-form contention run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContendRequest {
    /// Gate capacity
    pub capacity: usize,
    /// Number of competing workers
    pub workers: usize,
    /// Time each worker holds its slot
    pub hold: Duration,
    /// Give up waiting after this long (`None` waits forever)
    pub timeout: Option<Duration>,
}

impl ContendRequest {
    /// Create a request without a timeout
    #[must_use]
    pub fn new(capacity: usize, workers: usize, hold: Duration) -> Self {
        Self {
            capacity,
            workers,
            hold,
            timeout: None,
        }
    }

    /// Make workers give up after `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
