#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations for semgate
//!
//! This crate sits between the CLI and the gate itself. Each operation
//! builds a fresh [`semgate_resources::BoundedResourceGate`], drives worker
//! threads through it, and reports progress as events on the context's
//! sender. Operations are blocking; async callers should run them on a
//! blocking task.

mod context;
mod demos;
mod runner;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use types::ContendRequest;

// Re-export operation functions
pub use demos::{contend, printer, show_config, tables};

use semgate_errors::Error;
use semgate_types::RunReport;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Timeline of a demo run
    Run(RunReport),
    /// Generic success message
    Success(String),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check if this is a success result
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::Success(_) => true,
            OperationResult::Run(report) => report.timed_out() == 0,
        }
    }
}
