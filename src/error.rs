use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Storage for the queue, a node or a payload copy could not be allocated.
    #[error("allocation failed")]
    AllocationFailure,

    #[error("queue is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, QueueError>;
