#![deny(clippy::pedantic, unsafe_code)]

//! Bounded resource gate for semgate
//!
//! This crate provides the counting-semaphore primitive that regulates how
//! many concurrent callers may be inside a critical section, plus a scoped
//! permit that gives the slot back on drop and the capacity limits used by
//! the demo operations.

pub mod gate;
pub mod limits;
pub mod permit;

pub use gate::{BoundedResourceGate, Grant, Release};
pub use limits::{GateLimits, IntoGateLimits};
pub use permit::GatePermit;
