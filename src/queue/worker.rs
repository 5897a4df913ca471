//! Per-instance worker loop
//!
//! One worker thread serves one queue instance:
//! Starting -> Polling -> (stop signalled) -> Draining -> Stopped.
//!
//! While polling, the worker pops one envelope at a time and dispatches it
//! with the ring lock released. An empty ring parks the worker on the
//! instance's condition variable; producers signal it on every push, and a
//! bounded timed wait re-checks the stop flag even if a wake-up never comes.

use crate::queue::instance::InstanceShared;
use std::time::Duration;

/// Upper bound on how long an idle worker sleeps before re-checking the
/// stop flag.
const LIVENESS_WAIT: Duration = Duration::from_millis(100);

pub(crate) fn run<T>(shared: &InstanceShared<T>) {
    log::trace!("event worker started");
    poll(shared);
    drain(shared);
    log::trace!("event worker stopped");
}

fn poll<T>(shared: &InstanceShared<T>) {
    while shared.is_alive() {
        let popped = {
            let mut ring = shared.ring.lock().unwrap();
            match ring.pop_front() {
                Some(envelope) => Some(envelope),
                None => {
                    // Re-check under the lock: a stop signalled between the
                    // loop condition and this point must not be slept past.
                    if !shared.is_alive() {
                        return;
                    }
                    let (mut ring, _timed_out) = shared
                        .work_ready
                        .wait_timeout(ring, LIVENESS_WAIT)
                        .unwrap();
                    ring.pop_front()
                }
            }
        };
        // Dispatch with the lock released: a slow callback stalls only this
        // instance's own dispatch, never its producers.
        if let Some(envelope) = popped {
            envelope.dispatch();
        }
    }
}

/// Final drain after the stop flag clears.
///
/// The occupied count is snapshotted once: exactly that many entries are
/// processed, and entries arriving mid-drain stay behind. A backlog above the
/// logical ceiling is treated as unrecoverable overflow and abandoned
/// outright rather than drained unboundedly.
fn drain<T>(shared: &InstanceShared<T>) {
    let backlog = shared.ring.lock().unwrap().len();
    if backlog > shared.ceiling {
        log::warn!(
            "abandoning {backlog} queued notifications at shutdown (ceiling: {})",
            shared.ceiling
        );
        return;
    }

    for _ in 0..backlog {
        let envelope = shared.ring.lock().unwrap().pop_front();
        match envelope {
            Some(envelope) => envelope.dispatch(),
            None => break,
        }
    }
}
