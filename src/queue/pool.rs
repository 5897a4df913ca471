//! Fixed-size instance registry
//!
//! The pool maps a small integer handle to a queue instance. It owns all
//! instance storage for its lifetime and carries none of the concurrency
//! logic itself: every operation is a bounds-checked lookup followed by a
//! delegation to the slot. Handles outside the slot range are rejected at
//! this boundary.

use crate::queue::envelope::EventCallback;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::instance::QueueInstance;
use crate::queue::InstanceStats;

/// Slot count used by [`EventQueuePool::new`].
pub const DEFAULT_POOL_SLOTS: usize = 10;

/// Registry of independent single-consumer notification queues, addressed by
/// integer handle.
pub struct EventQueuePool<T: Send + 'static> {
    slots: Vec<QueueInstance<T>>,
}

impl<T: Send + 'static> EventQueuePool<T> {
    /// Pool with the default number of slots.
    pub fn new() -> Self {
        Self {
            slots: (0..DEFAULT_POOL_SLOTS).map(|_| QueueInstance::new()).collect(),
        }
    }

    /// Pool with a caller-chosen slot count, for deployments that size the
    /// registry from configuration.
    pub fn with_slots(slots: usize) -> QueueResult<Self> {
        if slots == 0 {
            return Err(QueueError::InvalidParameter {
                message: "pool requires at least one slot".to_string(),
            });
        }
        Ok(Self {
            slots: (0..slots).map(|_| QueueInstance::new()).collect(),
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, handle: usize) -> QueueResult<&QueueInstance<T>> {
        self.slots
            .get(handle)
            .ok_or(QueueError::InvalidHandle { handle })
    }

    /// Bring the instance at `handle` up: ring storage, ceiling, worker
    /// thread.
    ///
    /// A zero `logical_ceiling` falls back to the default. `AlreadyCreated`
    /// is recoverable; callers that retry creation may treat it as success.
    pub fn create(&self, handle: usize, logical_ceiling: usize) -> QueueResult<()> {
        self.slot(handle)?
            .create(logical_ceiling, format!("eventq-worker-{handle}"))
    }

    /// Stop and join the instance's worker, draining per the shutdown
    /// policy, then release its storage. Idempotent for any valid handle.
    pub fn destroy(&self, handle: usize) -> QueueResult<()> {
        self.slot(handle)?.destroy()
    }

    /// Fire-and-forget: enqueue `data` (and an optional callback to receive
    /// it) for asynchronous dispatch on the instance's worker thread.
    ///
    /// Never blocks on consumer speed: at or above the instance's logical
    /// ceiling the notification is dropped with `QueueFull`. Entries admitted
    /// to one instance are dispatched in FIFO order.
    pub fn notify(
        &self,
        handle: usize,
        data: T,
        callback: Option<EventCallback<T>>,
    ) -> QueueResult<()> {
        self.slot(handle)?.notify(data, callback)
    }

    /// Admission threshold of the instance, or 0 for an invalid or uncreated
    /// handle.
    pub fn logical_ceiling(&self, handle: usize) -> usize {
        self.slots
            .get(handle)
            .map_or(0, QueueInstance::logical_ceiling)
    }

    /// Entries currently queued on the instance, or 0 for an invalid or
    /// uncreated handle.
    pub fn occupied_count(&self, handle: usize) -> usize {
        self.slots
            .get(handle)
            .map_or(0, QueueInstance::occupied_count)
    }

    pub fn is_created(&self, handle: usize) -> bool {
        self.slots.get(handle).is_some_and(QueueInstance::is_created)
    }

    /// Point-in-time snapshot of one instance; zeroed for invalid handles.
    pub fn stats(&self, handle: usize) -> InstanceStats {
        self.slots
            .get(handle)
            .map_or_else(InstanceStats::default, QueueInstance::stats)
    }

    /// Destroy every created instance, logging and continuing past
    /// per-instance failures.
    pub fn shutdown(&self) {
        for (handle, instance) in self.slots.iter().enumerate() {
            if let Err(err) = instance.destroy() {
                log::warn!("shutdown of instance {handle} failed: {err}");
            }
        }
    }
}

impl<T: Send + 'static> Default for EventQueuePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Drop for EventQueuePool<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
