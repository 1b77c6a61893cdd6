//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpsError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("component not found: {component}")]
    MissingComponent { component: String },

    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("conservation violated: {available} of {capacity} slots free after run")]
    ConservationViolated { available: usize, capacity: usize },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("task execution failed: {message}")]
    TaskError { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRequest { .. } => Some("Check the command arguments and retry."),
            Self::ConservationViolated { .. } => Some("This is a bug in semgate; please report it."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidRequest { .. } => "ops.invalid_request",
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::WorkerPanicked { .. } => "ops.worker_panicked",
            Self::ConservationViolated { .. } => "ops.conservation_violated",
            Self::SerializationError { .. } => "ops.serialization_error",
            Self::TaskError { .. } => "ops.task_error",
        };
        Some(code)
    }
}
