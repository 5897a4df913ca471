//! Queue Error Types

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid instance handle: {handle}")]
    InvalidHandle { handle: usize },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Instance already created")]
    AlreadyCreated,

    #[error("Queue storage allocation failed: {message}")]
    AllocationFailure { message: String },

    #[error("Worker thread start failed: {source}")]
    ThreadStartFailure {
        #[source]
        source: std::io::Error,
    },

    #[error("Queue is full (ceiling: {ceiling})")]
    QueueFull { ceiling: usize },

    #[error("Worker thread join failed")]
    JoinFailure,
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
