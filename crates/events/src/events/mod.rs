use serde::{Deserialize, Serialize};

use crate::EventSource;
use semgate_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, when the error has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

// Declare all domain modules
pub mod gate;
pub mod run;

pub use gate::*;
pub use run::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Gate lifecycle events (creation, teardown)
    Gate(GateEvent),

    /// Worker events of a demo run (waiting, granted, released)
    Run(RunEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::Gate(_) => EventSource::Gate,
            Self::Run(_) => EventSource::Run,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Run(RunEvent::Failed { .. }) => Level::ERROR,

            Self::Gate(GateEvent::TeardownRefused { .. })
            | Self::Run(
                RunEvent::WorkerTimedOut { .. }
                | RunEvent::SlotReturned {
                    outcome: ReleaseOutcome::Clamped,
                    ..
                },
            ) => Level::WARN,

            // Per-worker chatter
            Self::Run(
                RunEvent::WorkerWaiting { .. }
                | RunEvent::WorkerGranted { .. }
                | RunEvent::WorkerReleased { .. }
                | RunEvent::SlotReturned { .. },
            ) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::Gate(_) => "semgate::events::gate",
            Self::Run(_) => "semgate::events::run",
        }
    }
}
