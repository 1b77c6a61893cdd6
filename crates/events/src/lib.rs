#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in semgate
//!
//! Operations never print. Everything a demo run wants to show travels as
//! an [`EventMessage`] over an unbounded channel to the CLI, which decides
//! how to render or log it.
//!
//! ## Architecture
//!
//! - **Domain-driven events**: events grouped by domain (Gate, Run)
//! - **Unified `EventEmitter` trait**: single API for all event emissions
//! - **Metadata envelope**: every event carries an [`EventMeta`] with id,
//!   timestamp, level and source for tracing integration

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, FailureContext, GateEvent, ReleaseOutcome, RunEvent};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// An event together with its metadata envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    /// Wrap an event, deriving level and source from the event itself
    #[must_use]
    pub fn new(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }

    /// Wrap an event with caller-provided metadata
    #[must_use]
    pub fn with_meta(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }
}

impl From<AppEvent> for EventMessage {
    fn from(event: AppEvent) -> Self {
        Self::new(event)
    }
}

/// Type alias for event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout semgate
///
/// This trait provides a single, consistent API for emitting events regardless of
/// whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        self.emit_message(EventMessage::new(event));
    }

    /// Emit a pre-built message, keeping its metadata
    fn emit_message(&self, message: EventMessage) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(message);
        }
    }

    /// Emit a gate event
    fn emit_gate(&self, event: GateEvent) {
        self.emit(AppEvent::Gate(event));
    }

    /// Emit a run event, correlated by its run id
    fn emit_run(&self, event: RunEvent) {
        let correlation = event.run_id().to_string();
        let event = AppEvent::Run(event);
        let meta = EventMeta::new(event.log_level(), event.event_source())
            .with_correlation_id(correlation);
        self.emit_message(EventMessage::with_meta(meta, event));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
