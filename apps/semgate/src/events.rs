//! Event handling and progress display

use crate::logging::log_event_with_tracing;
use console::{Style, Term};
use semgate_events::{AppEvent, EventMessage, GateEvent, ReleaseOutcome, RunEvent};
use semgate_types::RunKind;

/// Event handler for progress lines and user feedback
pub struct EventHandler {
    /// Terminal for progress lines
    term: Term,
    /// Whether to style output
    colors_enabled: bool,
    /// Whether to show debug-level events
    debug_enabled: bool,
    /// Suppress every progress line (JSON mode)
    quiet: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            colors_enabled,
            debug_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);
        if self.quiet {
            return;
        }

        match &message.event {
            AppEvent::Run(event) => self.handle_run_event(event),
            AppEvent::Gate(event) => self.handle_gate_event(event),
        }
    }

    fn handle_run_event(&self, event: &RunEvent) {
        match event {
            RunEvent::Failed { failure, .. } => {
                self.show_error(&format!("Run failed: {}", failure.message));
            }
            RunEvent::WorkerTimedOut { .. } => {
                if let Some(line) = describe_run_event(event) {
                    self.show_warning(&line);
                }
            }
            RunEvent::SlotReturned { label, outcome, .. } => match outcome {
                ReleaseOutcome::Clamped => {
                    self.show_warning(&format!("{label} released a slot it did not hold"));
                }
                ReleaseOutcome::HandedOff => {
                    self.show_debug(&format!("{label}'s slot went to the next in line"));
                }
                ReleaseOutcome::Freed { available } => {
                    self.show_debug(&format!("{label}'s slot is free again (free: {available})"));
                }
            },
            _ => {
                if let Some(line) = describe_run_event(event) {
                    self.show_status(&line);
                }
            }
        }
    }

    fn handle_gate_event(&self, event: &GateEvent) {
        match event {
            GateEvent::TeardownRefused { snapshot } => self.show_error(&format!(
                "Gate still in use at teardown: {} holders, {} waiting",
                snapshot.holders, snapshot.waiters
            )),
            GateEvent::Created { capacity, policy } => {
                self.show_debug(&format!("Gate created (capacity {capacity}, {policy} policy)"));
            }
            GateEvent::Destroyed { capacity } => {
                self.show_debug(&format!("Gate of capacity {capacity} destroyed"));
            }
        }
    }

    fn show_status(&self, message: &str) {
        self.term.write_line(message).unwrap_or(());
    }

    fn show_warning(&self, message: &str) {
        let line = self.paint(Style::new().yellow(), message);
        self.term.write_line(&line).unwrap_or(());
    }

    fn show_error(&self, message: &str) {
        let line = self.paint(Style::new().red().bold(), message);
        Term::stderr().write_line(&line).unwrap_or(());
    }

    fn show_debug(&self, message: &str) {
        if self.debug_enabled {
            let line = self.paint(Style::new().dim(), message);
            self.term.write_line(&line).unwrap_or(());
        }
    }

    fn paint(&self, style: Style, message: &str) -> String {
        style
            .force_styling(self.colors_enabled)
            .apply_to(message)
            .to_string()
    }
}

/// One progress line per worker event, worded for the demo that emitted it
fn describe_run_event(event: &RunEvent) -> Option<String> {
    let line = match event {
        RunEvent::Started {
            kind,
            capacity,
            workers,
            ..
        } => match kind {
            RunKind::Printer => format!("{workers} users share 1 printer"),
            RunKind::Tables => format!("{workers} students share {capacity} tables"),
            RunKind::Contend => format!("{workers} workers share {capacity} slots"),
        },
        RunEvent::WorkerWaiting { kind, label, .. } => match kind {
            RunKind::Printer => format!("{label} is waiting for the printer..."),
            RunKind::Tables => format!("{label} is waiting for a table..."),
            RunKind::Contend => format!("{label} is waiting for a slot..."),
        },
        RunEvent::WorkerGranted {
            kind,
            label,
            available,
            ..
        } => match kind {
            RunKind::Printer => format!("{label} is using the printer..."),
            RunKind::Tables => format!("{label} got a table (tables free: {available})"),
            RunKind::Contend => format!("{label} got a slot (free: {available})"),
        },
        RunEvent::WorkerReleased { kind, label, .. } => match kind {
            RunKind::Printer => format!("{label} finished printing."),
            RunKind::Tables => format!("{label} left the table."),
            RunKind::Contend => format!("{label} released its slot."),
        },
        RunEvent::WorkerTimedOut {
            label, waited_ms, ..
        } => format!("{label} gave up after {waited_ms} ms"),
        RunEvent::Completed {
            elapsed_ms,
            peak_holders,
            ..
        } => format!("All done in {elapsed_ms} ms (at most {peak_holders} inside at once)"),
        RunEvent::SlotReturned { .. } | RunEvent::Failed { .. } => return None,
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use semgate_types::Uuid;

    #[test]
    fn test_printer_wording() {
        let run_id = Uuid::new_v4();
        let granted = RunEvent::WorkerGranted {
            run_id,
            kind: RunKind::Printer,
            worker: 1,
            label: "User1".to_string(),
            available: 0,
            waited: false,
        };
        assert_eq!(
            describe_run_event(&granted).as_deref(),
            Some("User1 is using the printer...")
        );

        let released = RunEvent::WorkerReleased {
            run_id,
            kind: RunKind::Printer,
            worker: 1,
            label: "User1".to_string(),
        };
        assert_eq!(
            describe_run_event(&released).as_deref(),
            Some("User1 finished printing.")
        );
    }

    #[test]
    fn test_tables_wording() {
        let granted = RunEvent::WorkerGranted {
            run_id: Uuid::new_v4(),
            kind: RunKind::Tables,
            worker: 4,
            label: "Student 4".to_string(),
            available: 2,
            waited: false,
        };
        assert_eq!(
            describe_run_event(&granted).as_deref(),
            Some("Student 4 got a table (tables free: 2)")
        );
    }

    #[test]
    fn test_handler_accepts_every_domain() {
        let mut handler = EventHandler::new(false, true, true);
        handler.handle_event(EventMessage::new(AppEvent::Run(RunEvent::SlotReturned {
            run_id: Uuid::new_v4(),
            kind: RunKind::Contend,
            worker: 2,
            label: "Worker 2".to_string(),
            outcome: ReleaseOutcome::Clamped,
        })));
        handler.handle_event(EventMessage::new(AppEvent::Gate(GateEvent::Destroyed {
            capacity: 3,
        })));
        // Verify no panics occur
    }
}
