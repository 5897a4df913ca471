//! Queue instance lifecycle
//!
//! A `QueueInstance` is the unit of isolation: one ring buffer, one lock, one
//! worker thread. Producer-facing lifecycle state (created or not, the worker
//! join handle) lives behind an `RwLock` so notifies and read-only queries
//! share access while create/destroy take it exclusively. The state the
//! worker thread sees is confined to [`InstanceShared`]; the ring mutex is
//! the only lock both sides ever touch, and it is never held across a
//! callback dispatch.

use crate::queue::envelope::{Envelope, EventCallback};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::ring::{EventRing, DEFAULT_RING_CAPACITY};
use crate::queue::{worker, InstanceStats};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock};
use std::thread::JoinHandle;

/// Admission threshold applied when a caller passes a zero ceiling.
pub const DEFAULT_LOGICAL_CEILING: usize = DEFAULT_RING_CAPACITY;

/// State shared between producers and the instance's worker thread.
pub(crate) struct InstanceShared<T> {
    /// Guards every read and write of the ring. Held only across a single
    /// push or pop, never across dispatch.
    pub(crate) ring: Mutex<EventRing<Envelope<T>>>,
    /// Signalled on every push so an idle worker wakes promptly.
    pub(crate) work_ready: Condvar,
    /// Cleared by `destroy` to stop the worker loop.
    pub(crate) alive: AtomicBool,
    /// Admission threshold. Independent of the ring's physical capacity:
    /// it only decides whether new work is accepted, never how the buffer
    /// is sized.
    pub(crate) ceiling: usize,
}

impl<T> InstanceShared<T> {
    pub(crate) fn new(ceiling: usize) -> QueueResult<Self> {
        Ok(Self {
            ring: Mutex::new(EventRing::with_capacity(DEFAULT_RING_CAPACITY)?),
            work_ready: Condvar::new(),
            alive: AtomicBool::new(true),
            ceiling,
        })
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

struct ActiveState<T> {
    shared: Arc<InstanceShared<T>>,
    worker: Option<JoinHandle<()>>,
}

/// One pool slot. `None` state means not created (or destroyed); the slot is
/// logically reset between a destroy and the next create, never deallocated.
pub(crate) struct QueueInstance<T> {
    state: RwLock<Option<ActiveState<T>>>,
}

impl<T: Send + 'static> QueueInstance<T> {
    /// Initialize the ring at default physical capacity, record the ceiling
    /// and start the worker thread.
    ///
    /// Fails `AlreadyCreated` on a live instance. If the thread cannot be
    /// started the freshly allocated queue storage is torn down and the
    /// instance is left uncreated.
    pub(crate) fn create(&self, logical_ceiling: usize, thread_name: String) -> QueueResult<()> {
        let mut state = self.state.write().unwrap();
        if state.is_some() {
            return Err(QueueError::AlreadyCreated);
        }

        let ceiling = if logical_ceiling > 0 {
            logical_ceiling
        } else {
            DEFAULT_LOGICAL_CEILING
        };
        let shared = Arc::new(InstanceShared::new(ceiling)?);

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker::run(&worker_shared))
            .map_err(|source| QueueError::ThreadStartFailure { source })?;

        *state = Some(ActiveState {
            shared,
            worker: Some(worker),
        });
        Ok(())
    }
}

impl<T> QueueInstance<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Enqueue one notification for asynchronous dispatch.
    ///
    /// Admission is checked first: at or above the logical ceiling the
    /// notification is dropped with `QueueFull` rather than ever blocking
    /// the producer. Admission and push happen under a single lock
    /// acquisition.
    pub(crate) fn notify(&self, data: T, callback: Option<EventCallback<T>>) -> QueueResult<()> {
        let state = self.state.read().unwrap();
        let Some(active) = state.as_ref() else {
            // An uncreated instance reports ceiling 0 and occupancy 0, so
            // admission rejects it the same way a saturated one is rejected.
            return Err(QueueError::QueueFull { ceiling: 0 });
        };

        let shared = &active.shared;
        let mut ring = shared.ring.lock().unwrap();
        if ring.len() >= shared.ceiling {
            return Err(QueueError::QueueFull {
                ceiling: shared.ceiling,
            });
        }
        ring.push_back(Envelope::Event { data, callback })?;
        drop(ring);

        shared.work_ready.notify_one();
        Ok(())
    }

    /// Stop the worker, wait for it to finish its final drain and drop the
    /// queue storage. Idempotent: destroying a never-created or already
    /// destroyed instance is a no-op.
    pub(crate) fn destroy(&self) -> QueueResult<()> {
        let mut state = self.state.write().unwrap();
        let Some(mut active) = state.take() else {
            return Ok(());
        };

        active.shared.alive.store(false, Ordering::Release);
        {
            let mut ring = active.shared.ring.lock().unwrap();
            if let Err(err) = ring.push_back(Envelope::Poison) {
                log::warn!("failed to enqueue shutdown sentinel: {err}");
            }
        }
        active.shared.work_ready.notify_one();

        if let Some(worker) = active.worker.take() {
            worker.join().map_err(|_| QueueError::JoinFailure)?;
        }
        Ok(())
    }

    pub(crate) fn is_created(&self) -> bool {
        self.state.read().unwrap().is_some()
    }

    pub(crate) fn logical_ceiling(&self) -> usize {
        self.state
            .read()
            .unwrap()
            .as_ref()
            .map_or(0, |active| active.shared.ceiling)
    }

    pub(crate) fn occupied_count(&self) -> usize {
        self.state
            .read()
            .unwrap()
            .as_ref()
            .map_or(0, |active| active.shared.ring.lock().unwrap().len())
    }

    pub(crate) fn stats(&self) -> InstanceStats {
        let state = self.state.read().unwrap();
        match state.as_ref() {
            Some(active) => {
                let ring = active.shared.ring.lock().unwrap();
                InstanceStats {
                    created: true,
                    occupied: ring.len(),
                    ceiling: active.shared.ceiling,
                    capacity: ring.capacity(),
                }
            }
            None => InstanceStats {
                created: false,
                occupied: 0,
                ceiling: 0,
                capacity: 0,
            },
        }
    }
}
