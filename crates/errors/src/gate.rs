//! Bounded resource gate error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Usage errors surfaced by the bounded resource gate.
///
/// None of these are transient: the gate never retries internally, and only
/// [`GateError::Timeout`] is worth retrying from the caller's side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GateError {
    #[error("invalid gate capacity: {capacity} (must be at least 1)")]
    InvalidCapacity { capacity: usize },

    #[error("unbalanced release: all {capacity} slots are already free")]
    UnbalancedRelease { capacity: usize },

    #[error("gate in use: {holders} holder(s), {waiters} waiter(s)")]
    GateInUse { holders: usize, waiters: usize },

    #[error("gate has been destroyed")]
    GateDestroyed,

    #[error("timed out after {waited_ms}ms waiting for a slot")]
    Timeout { waited_ms: u64 },
}

impl UserFacingError for GateError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidCapacity { .. } => Some("Construct the gate with a capacity of 1 or more."),
            Self::UnbalancedRelease { .. } => {
                Some("Call release exactly once per successful acquire, or use a scoped permit.")
            }
            Self::GateInUse { .. } => {
                Some("Wait for every holder to release before tearing the gate down.")
            }
            Self::GateDestroyed => Some("Create a new gate; a destroyed gate cannot be reused."),
            Self::Timeout { .. } => Some("Increase the timeout or reduce contention and retry."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidCapacity { .. } => "gate.invalid_capacity",
            Self::UnbalancedRelease { .. } => "gate.unbalanced_release",
            Self::GateInUse { .. } => "gate.in_use",
            Self::GateDestroyed => "gate.destroyed",
            Self::Timeout { .. } => "gate.timeout",
        };
        Some(code)
    }
}
