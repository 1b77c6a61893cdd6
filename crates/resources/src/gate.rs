//! Counting semaphore with FIFO hand-off
//!
//! A [`BoundedResourceGate`] admits at most `capacity` concurrent holders.
//! Callers that find no free slot park in a FIFO queue; every release either
//! frees a slot or hands it directly to the oldest waiter, so a slot is never
//! lost and never granted twice.
//!
//! All state lives behind one mutex. Each parked caller owns a condition
//! variable that is only ever waited on with that mutex, which lets a release
//! wake exactly the waiter it selected instead of the whole queue.

use semgate_errors::GateError;
use semgate_types::{GateSnapshot, ReleasePolicy};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use crate::permit::GatePermit;

/// How a caller obtained its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    /// The caller parked before the slot was handed to it
    pub waited: bool,
    /// Free slots right after the grant
    pub available: usize,
}

/// What a release did with the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The slot went back to the pool
    Freed { available: usize },
    /// The slot went straight to the oldest waiter
    HandedOff,
    /// Unbalanced release ignored under [`ReleasePolicy::Clamp`]
    Clamped,
}

/// Parked caller. `granted` is only written with the gate mutex held.
#[derive(Debug)]
struct Waiter {
    ticket: u64,
    granted: AtomicBool,
    wake: Condvar,
}

#[derive(Debug)]
struct GateState {
    available: usize,
    waiters: VecDeque<Arc<Waiter>>,
    next_ticket: u64,
    destroyed: bool,
}

/// Counting semaphore limiting concurrent admission to `capacity` holders
///
/// The gate does not track which caller holds a slot: any caller may
/// release, and a caller acquiring twice holds two slots. Prefer
/// [`BoundedResourceGate::permit`] so the slot is returned on every exit
/// path.
#[derive(Debug)]
pub struct BoundedResourceGate {
    capacity: usize,
    policy: ReleasePolicy,
    state: Mutex<GateState>,
}

impl BoundedResourceGate {
    /// Create a gate with `capacity` free slots and the strict release policy
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, GateError> {
        Self::with_policy(capacity, ReleasePolicy::Strict)
    }

    /// Create a gate with an explicit release policy
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_policy(capacity: usize, policy: ReleasePolicy) -> Result<Self, GateError> {
        if capacity == 0 {
            return Err(GateError::InvalidCapacity { capacity });
        }

        debug!(capacity, %policy, "gate created");
        Ok(Self {
            capacity,
            policy,
            state: Mutex::new(GateState {
                available: capacity,
                waiters: VecDeque::new(),
                next_ticket: 0,
                destroyed: false,
            }),
        })
    }

    /// Take one slot, parking until a release hands one over if none is free
    ///
    /// # Errors
    ///
    /// Returns [`GateError::GateDestroyed`] if the gate was torn down.
    pub fn acquire(&self) -> Result<Grant, GateError> {
        self.acquire_until(None, || {})
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`
    ///
    /// A caller that times out leaves the queue without consuming a slot. If
    /// a release selected the caller while it was timing out, the grant wins
    /// and the call succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Timeout`] if no slot was granted in time, or
    /// [`GateError::GateDestroyed`] if the gate was torn down.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<Grant, GateError> {
        self.acquire_until(Some(Instant::now() + timeout), || {})
    }

    /// Take a free slot without parking
    ///
    /// Returns `Ok(false)` when no slot is free or when other callers are
    /// already queued; queued callers are never overtaken.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::GateDestroyed`] if the gate was torn down.
    pub fn try_acquire(&self) -> Result<bool, GateError> {
        Ok(self.try_grant()?.is_some())
    }

    /// Give one slot back, waking the oldest waiter if there is one
    ///
    /// # Errors
    ///
    /// Returns [`GateError::UnbalancedRelease`] under the strict policy when
    /// every slot is already free, or [`GateError::GateDestroyed`] if the
    /// gate was torn down.
    pub fn release(&self) -> Result<Release, GateError> {
        let mut state = self.lock();
        if state.destroyed {
            return Err(GateError::GateDestroyed);
        }

        if let Some(waiter) = state.waiters.pop_front() {
            waiter.granted.store(true, Ordering::Relaxed);
            waiter.wake.notify_one();
            self.check_invariants(&state);
            debug!(
                ticket = waiter.ticket,
                waiters = state.waiters.len(),
                "slot handed off"
            );
            return Ok(Release::HandedOff);
        }

        if state.available == self.capacity {
            return match self.policy {
                ReleasePolicy::Strict => Err(GateError::UnbalancedRelease {
                    capacity: self.capacity,
                }),
                ReleasePolicy::Clamp => {
                    warn!(capacity = self.capacity, "unbalanced release ignored");
                    Ok(Release::Clamped)
                }
            };
        }

        state.available += 1;
        self.check_invariants(&state);
        debug!(available = state.available, "slot freed");
        Ok(Release::Freed {
            available: state.available,
        })
    }

    /// Acquire a slot wrapped in a permit that releases on drop
    ///
    /// # Errors
    ///
    /// Returns [`GateError::GateDestroyed`] if the gate was torn down.
    pub fn permit(&self) -> Result<GatePermit<'_>, GateError> {
        let grant = self.acquire()?;
        Ok(GatePermit::new(self, grant))
    }

    /// Permit variant of [`acquire_timeout`](Self::acquire_timeout)
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Timeout`] or [`GateError::GateDestroyed`].
    pub fn permit_timeout(&self, timeout: Duration) -> Result<GatePermit<'_>, GateError> {
        let grant = self.acquire_timeout(timeout)?;
        Ok(GatePermit::new(self, grant))
    }

    /// Acquire a permit, calling `on_park` once if the caller has to queue
    ///
    /// `on_park` runs after the caller joined the queue and outside the gate
    /// lock, so it never fires for a caller that got a free slot. With a
    /// `timeout` this behaves like [`permit_timeout`](Self::permit_timeout).
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Timeout`] or [`GateError::GateDestroyed`].
    pub fn permit_with(
        &self,
        timeout: Option<Duration>,
        on_park: impl FnOnce(),
    ) -> Result<GatePermit<'_>, GateError> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let grant = self.acquire_until(deadline, on_park)?;
        Ok(GatePermit::new(self, grant))
    }

    /// Permit variant of [`try_acquire`](Self::try_acquire)
    ///
    /// # Errors
    ///
    /// Returns [`GateError::GateDestroyed`] if the gate was torn down.
    pub fn try_permit(&self) -> Result<Option<GatePermit<'_>>, GateError> {
        Ok(self.try_grant()?.map(|grant| GatePermit::new(self, grant)))
    }

    /// Tear the gate down once nobody holds or waits for a slot
    ///
    /// Afterwards every acquire and release fails with
    /// [`GateError::GateDestroyed`]. Destroying twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::GateInUse`] while holders or waiters remain.
    pub fn destroy(&self) -> Result<(), GateError> {
        let mut state = self.lock();
        if state.destroyed {
            return Ok(());
        }

        let holders = self.capacity - state.available;
        let waiters = state.waiters.len();
        if holders > 0 || waiters > 0 {
            return Err(GateError::GateInUse { holders, waiters });
        }

        state.destroyed = true;
        debug!(capacity = self.capacity, "gate destroyed");
        Ok(())
    }

    /// Maximum number of concurrent holders
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Release policy chosen at construction
    #[must_use]
    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }

    /// Free slots right now
    #[must_use]
    pub fn available(&self) -> usize {
        self.lock().available
    }

    /// Callers currently parked in acquire
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Callers currently holding a slot
    #[must_use]
    pub fn holders(&self) -> usize {
        self.capacity - self.lock().available
    }

    /// Whether [`destroy`](Self::destroy) has succeeded
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lock().destroyed
    }

    /// Consistent copy of all counters
    #[must_use]
    pub fn snapshot(&self) -> GateSnapshot {
        let state = self.lock();
        GateSnapshot {
            capacity: self.capacity,
            available: state.available,
            holders: self.capacity - state.available,
            waiters: state.waiters.len(),
        }
    }

    fn try_grant(&self) -> Result<Option<Grant>, GateError> {
        let mut state = self.lock();
        if state.destroyed {
            return Err(GateError::GateDestroyed);
        }
        if state.available == 0 || !state.waiters.is_empty() {
            return Ok(None);
        }

        state.available -= 1;
        self.check_invariants(&state);
        debug!(available = state.available, "slot granted");
        Ok(Some(Grant {
            waited: false,
            available: state.available,
        }))
    }

    fn acquire_until(
        &self,
        deadline: Option<Instant>,
        on_park: impl FnOnce(),
    ) -> Result<Grant, GateError> {
        let mut state = self.lock();
        if state.destroyed {
            return Err(GateError::GateDestroyed);
        }

        if state.available > 0 {
            state.available -= 1;
            self.check_invariants(&state);
            debug!(available = state.available, "slot granted");
            return Ok(Grant {
                waited: false,
                available: state.available,
            });
        }

        let waiter = Arc::new(Waiter {
            ticket: state.next_ticket,
            granted: AtomicBool::new(false),
            wake: Condvar::new(),
        });
        state.next_ticket += 1;
        state.waiters.push_back(Arc::clone(&waiter));
        trace!(
            ticket = waiter.ticket,
            waiters = state.waiters.len(),
            "gate saturated, parking"
        );

        let started = Instant::now();
        // Queued before unlocking, so a release during the hook still finds us.
        drop(state);
        on_park();
        state = self.lock();

        loop {
            // Checked before the deadline so a hand-off racing a timeout is kept.
            if waiter.granted.load(Ordering::Relaxed) {
                debug!(ticket = waiter.ticket, "parked caller granted");
                return Ok(Grant {
                    waited: true,
                    available: state.available,
                });
            }

            match deadline {
                None => {
                    state = waiter
                        .wake
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        state.waiters.retain(|w| !Arc::ptr_eq(w, &waiter));
                        self.check_invariants(&state);
                        let waited_ms =
                            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                        debug!(ticket = waiter.ticket, waited_ms, "acquire timed out");
                        return Err(GateError::Timeout { waited_ms });
                    }
                    let (guard, _) = waiter
                        .wake
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    state = guard;
                }
            }
        }
    }

    // No user code runs under this lock, so poisoning carries no torn state.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_invariants(&self, state: &GateState) {
        assert!(
            state.available <= self.capacity,
            "gate invariant violated: {} slots free with capacity {}",
            state.available,
            self.capacity
        );
        assert!(
            state.waiters.is_empty() || state.available == 0,
            "gate invariant violated: {} waiters parked with {} slots free",
            state.waiters.len(),
            state.available
        );
    }
}

impl Drop for BoundedResourceGate {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if !state.destroyed && state.available != self.capacity {
            warn!(
                holders = self.capacity - state.available,
                "gate dropped while slots were still held"
            );
        }
    }
}
