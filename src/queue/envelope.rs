//! Notification envelopes carried through an instance's ring
//!
//! An envelope pairs one unit of producer data with the callback that should
//! receive it. Envelopes are constructed by the producer, owned by the ring
//! while queued, and consumed exactly once by the worker thread that pops
//! them. The `Poison` variant is the shutdown sentinel: it carries nothing
//! and dispatches as a no-op, existing only to wake a worker that is waiting
//! for work so it can observe the stop flag.

/// Outcome reported by a dispatch callback.
///
/// A failed callback does not affect the worker loop; the error is logged at
/// trace level and dropped.
pub type CallbackResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Callback invoked by the worker thread with the envelope's data.
pub type EventCallback<T> = Box<dyn FnOnce(T) -> CallbackResult + Send>;

/// One-shot unit of work flowing producer -> ring -> worker.
pub enum Envelope<T> {
    /// A producer notification: data plus an optional callback.
    Event {
        data: T,
        callback: Option<EventCallback<T>>,
    },
    /// Shutdown sentinel pushed by `destroy`; dispatches as a no-op.
    Poison,
}

impl<T> Envelope<T> {
    /// Consume the envelope, invoking the callback with the data.
    ///
    /// An event without a callback drops its data; callback errors are
    /// swallowed after a trace log.
    pub(crate) fn dispatch(self) {
        match self {
            Envelope::Event {
                data,
                callback: Some(callback),
            } => {
                if let Err(err) = callback(data) {
                    log::trace!("notification callback reported failure: {err}");
                }
            }
            Envelope::Event { callback: None, .. } => {}
            Envelope::Poison => {}
        }
    }
}

impl<T> std::fmt::Debug for Envelope<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Envelope::Event { callback, .. } => f
                .debug_struct("Event")
                .field("has_callback", &callback.is_some())
                .finish_non_exhaustive(),
            Envelope::Poison => f.write_str("Poison"),
        }
    }
}
