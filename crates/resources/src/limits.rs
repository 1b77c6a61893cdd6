//! Gate capacities used by the demo operations

use serde::{Deserialize, Serialize};

/// Slots given to each demo gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateLimits {
    /// Printers shared by the users (binary gate)
    pub printers: usize,
    /// Library tables shared by the students (counting gate)
    pub tables: usize,
}

/// Conversion from configuration into demo gate capacities
pub trait IntoGateLimits {
    fn into_gate_limits(self) -> GateLimits;
}
