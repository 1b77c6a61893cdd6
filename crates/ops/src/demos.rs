//! The demo operations: printer, library tables and free-form contention

use crate::runner::{self, RunPlan};
use crate::{ContendRequest, OpsCtx};
use semgate_errors::{Error, OpsError};
use semgate_resources::IntoGateLimits;
use semgate_types::{RunKind, RunReport};
use std::time::Duration;
use tracing::debug;

/// Users take turns on a single printer
///
/// The gate has one slot, so at most one user prints at any time.
///
/// # Errors
///
/// Returns an error if `users` is empty or the run fails.
pub fn printer(ctx: &OpsCtx, users: &[String], hold: Duration) -> Result<RunReport, Error> {
    if users.is_empty() {
        return Err(OpsError::InvalidRequest {
            message: "printer demo needs at least one user".to_string(),
        }
        .into());
    }

    let limits = (&ctx.config).into_gate_limits();
    debug!(users = users.len(), printers = limits.printers, "printer demo");

    runner::execute(
        ctx,
        &RunPlan {
            kind: RunKind::Printer,
            capacity: limits.printers,
            labels: users.to_vec(),
            hold,
            timeout: None,
        },
    )
}

/// Students share a fixed number of library tables
///
/// # Errors
///
/// Returns an error if `students` is zero, `tables` is zero, or the run fails.
pub fn tables(
    ctx: &OpsCtx,
    tables: usize,
    students: usize,
    hold: Duration,
) -> Result<RunReport, Error> {
    if students == 0 {
        return Err(OpsError::InvalidRequest {
            message: "tables demo needs at least one student".to_string(),
        }
        .into());
    }

    debug!(tables, students, "tables demo");
    runner::execute(
        ctx,
        &RunPlan {
            kind: RunKind::Tables,
            capacity: tables,
            labels: (1..=students).map(|i| format!("Student {i}")).collect(),
            hold,
            timeout: None,
        },
    )
}

/// Any number of workers competing for any capacity, optionally giving up
/// after a timeout
///
/// # Errors
///
/// Returns an error if `request.workers` is zero, the capacity is zero, or
/// the run fails.
pub fn contend(ctx: &OpsCtx, request: &ContendRequest) -> Result<RunReport, Error> {
    if request.workers == 0 {
        return Err(OpsError::InvalidRequest {
            message: "contention run needs at least one worker".to_string(),
        }
        .into());
    }

    runner::execute(
        ctx,
        &RunPlan {
            kind: RunKind::Contend,
            capacity: request.capacity,
            labels: (1..=request.workers)
                .map(|i| format!("Worker {i}"))
                .collect(),
            hold: request.hold,
            timeout: request.timeout,
        },
    )
}

/// Render the effective configuration as TOML
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn show_config(ctx: &OpsCtx) -> Result<String, Error> {
    ctx.config.to_toml()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsContextBuilder;
    use semgate_config::Config;
    use semgate_errors::GateError;
    use semgate_events::channel;

    fn ctx() -> OpsCtx {
        let (tx, _rx) = channel();
        OpsContextBuilder::new()
            .with_event_sender(tx)
            .with_config(Config::default())
            .build()
            .unwrap()
    }

    #[test]
    fn test_printer_is_exclusive() {
        let users = vec!["User1".to_string(), "User2".to_string()];
        let report = printer(&ctx(), &users, Duration::from_millis(15)).unwrap();

        assert_eq!(report.capacity, 1);
        assert_eq!(report.peak_holders, 1);
        assert_eq!(report.records[0].label, "User1");
    }

    #[test]
    fn test_printer_without_users() {
        let err = printer(&ctx(), &[], Duration::from_millis(1)).unwrap_err();
        assert!(matches!(err, Error::Ops(OpsError::InvalidRequest { .. })));
    }

    #[test]
    fn test_tables_labels_students() {
        let report = tables(&ctx(), 3, 4, Duration::from_millis(5)).unwrap();
        let labels: Vec<_> = report.records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Student 1", "Student 2", "Student 3", "Student 4"]);
    }

    #[test]
    fn test_zero_tables_fails_at_construction() {
        let err = tables(&ctx(), 0, 2, Duration::from_millis(5)).unwrap_err();
        assert!(matches!(
            err,
            Error::Gate(GateError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_contend_without_workers() {
        let request = ContendRequest::new(2, 0, Duration::from_millis(5));
        assert!(contend(&ctx(), &request).is_err());
    }

    #[test]
    fn test_show_config_is_toml() {
        let rendered = show_config(&ctx()).unwrap();
        assert!(rendered.contains("[tables]"));
    }
}
