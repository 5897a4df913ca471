//! Event Notification Queue Component
//!
//! A small fixed pool of independent, single-consumer event-notification
//! queues. Producers enqueue a (data, callback) pair; a dedicated worker
//! thread per queue dequeues entries and invokes the callback with the data,
//! asynchronously and in FIFO order relative to that queue.
//!
//! # Overview
//!
//! This is a decoupling primitive for fire-and-forget event dispatch
//! (logging, async side-effects) where producers must never block on
//! consumer speed. Key properties:
//!
//! - **Per-queue FIFO**: entries admitted to one instance dispatch in order,
//!   never reordered, duplicated or dropped
//! - **Backpressure by drop**: each instance has a logical admission ceiling;
//!   at or above it new notifications fail `QueueFull` instead of blocking
//! - **One worker thread per instance**: callbacks run on the worker, never
//!   on the producer's thread, and never under the queue lock
//! - **Grow-on-demand ring buffer**: admitted bursts below the ceiling are
//!   absorbed by resizing the physical buffer, preserving order across the
//!   resize
//! - **Graceful drain**: destroying an instance stops its worker, which
//!   drains the remaining backlog when it is within the ceiling
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Producer A  │     │  Producer B  │     │  Producer C  │
//! └──────┬───────┘     └──────┬───────┘     └──────┬───────┘
//!        │ notify(0, ..)      │ notify(0, ..)      │ notify(1, ..)
//!        ▼                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                EventQueuePool (handle -> instance)      │
//! │  ┌───────────────────────────────┐  ┌────────────────┐  │
//! │  │ Instance 0: mutex + EventRing │  │ Instance 1: .. │  │
//! │  │  ┌───┬───┬───┬───┬───┬───┐    │  │                │  │
//! │  │  │ 1 │ 2 │ 3 │ 4 │   │   │    │  │                │  │
//! │  │  └───┴───┴───┴───┴───┴───┘    │  │                │  │
//! │  └───────────────┬───────────────┘  └───────┬────────┘  │
//! └──────────────────┼──────────────────────────┼───────────┘
//!                    │ pop                      │ pop
//!            ┌───────┴───────┐          ┌───────┴───────┐
//!            │ Worker thread │          │ Worker thread │
//!            │  (callbacks)  │          │  (callbacks)  │
//!            └───────────────┘          └───────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use eventq::queue::{CallbackResult, EventQueuePool};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool: EventQueuePool<String> = EventQueuePool::new();
//!
//! // Bring up instance 0 with an admission ceiling of 1024 entries.
//! pool.create(0, 1024)?;
//!
//! // Fire-and-forget: the callback runs later, on the worker thread.
//! pool.notify(
//!     0,
//!     "something happened".to_string(),
//!     Some(Box::new(|data: String| -> CallbackResult {
//!         println!("dispatched: {data}");
//!         Ok(())
//!     })),
//! )?;
//!
//! // Stops the worker and drains the backlog.
//! pool.destroy(0)?;
//! # Ok(())
//! # }
//! ```

mod envelope;
mod error;
mod instance;
mod pool;
mod ring;
mod worker;

pub use envelope::{CallbackResult, Envelope, EventCallback};
pub use error::{QueueError, QueueResult};
pub use instance::DEFAULT_LOGICAL_CEILING;
pub use pool::{EventQueuePool, DEFAULT_POOL_SLOTS};
pub use ring::{EventRing, DEFAULT_RING_CAPACITY};

/// Point-in-time snapshot of one pool slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceStats {
    /// Whether the instance is currently created
    pub created: bool,
    /// Entries queued and not yet dispatched
    pub occupied: usize,
    /// Admission ceiling (0 when not created)
    pub ceiling: usize,
    /// Physical slot count of the ring (0 when not created)
    pub capacity: usize,
}

#[cfg(test)]
mod tests;
