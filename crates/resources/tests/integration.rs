//! Integration tests for the bounded resource gate

use proptest::prelude::*;
use semgate_errors::GateError;
use semgate_resources::{BoundedResourceGate, Release};
use semgate_types::ReleasePolicy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Run `workers` threads that each hold a slot for `hold`; returns peak
/// concurrency, parked workers and elapsed time.
fn run_workers(
    gate: &BoundedResourceGate,
    workers: usize,
    hold: Duration,
) -> (usize, usize, Duration) {
    let inside = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let parked = AtomicUsize::new(0);
    let started = Instant::now();

    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| {
                let permit = gate.permit().unwrap();
                if permit.waited() {
                    parked.fetch_add(1, Ordering::SeqCst);
                }
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(hold);
                inside.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });

    (
        peak.load(Ordering::SeqCst),
        parked.load(Ordering::SeqCst),
        started.elapsed(),
    )
}

#[test]
fn test_printer_mutual_exclusion() {
    let gate = BoundedResourceGate::new(1).unwrap();
    let hold = Duration::from_millis(100);

    let (peak, parked, elapsed) = run_workers(&gate, 2, hold);

    assert_eq!(peak, 1);
    assert_eq!(parked, 1);
    assert!(elapsed >= hold * 2);
    assert_eq!(gate.available(), 1);
    gate.destroy().unwrap();
}

#[test]
fn test_tables_bounded_concurrency() {
    let gate = BoundedResourceGate::new(3).unwrap();
    let hold = Duration::from_millis(200);

    let (peak, parked, elapsed) = run_workers(&gate, 6, hold);

    assert_eq!(peak, 3);
    assert_eq!(parked, 3);
    assert!(elapsed >= hold * 2);
    assert!(elapsed < hold * 6);
    assert_eq!(gate.available(), 3);
    gate.destroy().unwrap();
}

#[test]
fn test_zero_capacity_rejected() {
    assert_eq!(
        BoundedResourceGate::new(0).unwrap_err(),
        GateError::InvalidCapacity { capacity: 0 }
    );
}

#[test]
fn test_unbalanced_release_rejected() {
    let gate = BoundedResourceGate::new(4).unwrap();
    assert_eq!(
        gate.release().unwrap_err(),
        GateError::UnbalancedRelease { capacity: 4 }
    );
    assert_eq!(gate.snapshot().available, 4);
}

#[test]
fn test_conservation_after_paired_calls() {
    let gate = BoundedResourceGate::new(3).unwrap();
    thread::scope(|s| {
        for _ in 0..6 {
            s.spawn(|| {
                gate.acquire().unwrap();
                thread::sleep(Duration::from_millis(5));
                gate.release().unwrap();
            });
        }
    });
    assert_eq!(gate.available(), 3);
    assert!(gate.snapshot().is_quiescent());
}

#[test]
fn test_timeouts_racing_releases_lose_no_slots() {
    let gate = BoundedResourceGate::new(2).unwrap();
    let granted = AtomicUsize::new(0);

    thread::scope(|s| {
        for i in 0..16 {
            let gate = &gate;
            let granted = &granted;
            s.spawn(move || {
                for _ in 0..40 {
                    let timeout = Duration::from_micros(50 + (i % 4) * 100);
                    if let Ok(permit) = gate.permit_timeout(timeout) {
                        granted.fetch_add(1, Ordering::SeqCst);
                        thread::yield_now();
                        drop(permit);
                    }
                }
            });
        }
    });

    assert!(granted.load(Ordering::SeqCst) > 0);
    let snapshot = gate.snapshot();
    assert_eq!(snapshot.available, 2);
    assert_eq!(snapshot.waiters, 0);
    gate.destroy().unwrap();
}

#[test]
fn test_woken_waiter_needs_no_extra_release() {
    let gate = BoundedResourceGate::new(1).unwrap();
    gate.acquire().unwrap();

    thread::scope(|s| {
        let handle = s.spawn(|| gate.acquire().unwrap());
        while gate.waiting() == 0 {
            thread::yield_now();
        }
        assert_eq!(gate.release().unwrap(), Release::HandedOff);
        assert!(handle.join().unwrap().waited);
    });

    assert_eq!(gate.holders(), 1);
    gate.release().unwrap();
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Acquire,
    Release,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Acquire), Just(Op::Release)]
}

proptest! {
    #[test]
    fn prop_counter_stays_in_range(
        capacity in 1usize..8,
        clamp in any::<bool>(),
        ops in prop::collection::vec(op(), 0..64),
    ) {
        let policy = if clamp { ReleasePolicy::Clamp } else { ReleasePolicy::Strict };
        let gate = BoundedResourceGate::with_policy(capacity, policy).unwrap();
        let mut model = capacity;

        for op in ops {
            match op {
                Op::Acquire => {
                    let took = gate.try_acquire().unwrap();
                    prop_assert_eq!(took, model > 0);
                    if took {
                        model -= 1;
                    }
                }
                Op::Release => {
                    let result = gate.release();
                    if model == capacity {
                        match policy {
                            ReleasePolicy::Strict => {
                                prop_assert_eq!(
                                    result,
                                    Err(GateError::UnbalancedRelease { capacity })
                                );
                            }
                            ReleasePolicy::Clamp => {
                                prop_assert_eq!(result, Ok(Release::Clamped));
                            }
                        }
                    } else {
                        model += 1;
                        prop_assert_eq!(result, Ok(Release::Freed { available: model }));
                    }
                }
            }

            let snapshot = gate.snapshot();
            prop_assert!(snapshot.available <= snapshot.capacity);
            prop_assert_eq!(snapshot.available, model);
            prop_assert_eq!(snapshot.holders + snapshot.available, capacity);
        }
    }
}
