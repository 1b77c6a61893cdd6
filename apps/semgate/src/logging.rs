//! Structured logging integration for events
//!
//! Every event that reaches the CLI is also recorded through `tracing`, so a
//! `--debug` log file holds the full worker timeline with correlation ids.

use semgate_events::{AppEvent, EventMessage, GateEvent, RunEvent};
use tracing::{debug, error, info, trace, warn};

/// Log an `EventMessage` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;
    let level = meta.tracing_level();

    match event {
        AppEvent::Run(run_event) => match run_event {
            RunEvent::Started {
                kind,
                capacity,
                workers,
                hold_ms,
                ..
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    kind = %kind,
                    capacity = capacity,
                    workers = workers,
                    hold_ms = hold_ms,
                    "Run started"
                );
            }
            RunEvent::WorkerGranted {
                worker,
                label,
                available,
                waited,
                ..
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    worker = worker,
                    label = %label,
                    available = available,
                    waited = waited,
                    "Worker granted"
                );
            }
            // Clamped returns are warnings and go through the generic path.
            RunEvent::SlotReturned {
                worker,
                label,
                outcome,
                ..
            } if level == tracing::Level::DEBUG => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    worker = worker,
                    label = %label,
                    outcome = ?outcome,
                    "Slot returned"
                );
            }
            RunEvent::Failed { kind, failure, .. } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    kind = %kind,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Run failed"
                );
            }
            _ => log_generic(level, meta, event),
        },

        AppEvent::Gate(GateEvent::TeardownRefused { snapshot }) => {
            warn!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                holders = snapshot.holders,
                waiters = snapshot.waiters,
                available = snapshot.available,
                capacity = snapshot.capacity,
                "Gate teardown refused"
            );
        }

        // Fallback for all other event domains
        _ => log_generic(level, meta, event),
    }
}

fn log_generic(level: tracing::Level, meta: &semgate_events::EventMeta, event: &AppEvent) {
    match level {
        tracing::Level::ERROR => {
            error!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
        }
        tracing::Level::WARN => {
            warn!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
        }
        tracing::Level::INFO => {
            info!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
        }
        tracing::Level::DEBUG => {
            debug!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
        }
        tracing::Level::TRACE => {
            trace!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event")
        }
    }
}
