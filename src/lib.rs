pub mod arena_queue;
pub mod error;
pub mod handle;
pub mod linked_queue;
pub mod payload;

pub use arena_queue::ArenaQueue;
pub use error::{QueueError, Result};
pub use linked_queue::LinkedQueue;

/// A queue of owned string copies with insertion at both ends and removal
/// from the head.
///
/// Every insert copies the string; the caller's buffer is never aliased.
/// Dropping the queue releases every remaining element.
pub trait StringQueue {
    fn insert_head(&mut self, s: &str) -> Result<()>;

    fn insert_tail(&mut self, s: &str) -> Result<()>;

    /// Removes the head element. If `out` is given, the removed string is
    /// copied into it, truncated to `out.len() - 1` bytes and followed by
    /// zero bytes up to the end of the buffer. `out` is untouched when the
    /// queue is empty.
    fn remove_head(&mut self, out: Option<&mut [u8]>) -> Result<()>;

    /// Removes the head element and hands back its string.
    fn pop_head(&mut self) -> Result<String>;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Reverses the order of the elements in place. No element is
    /// allocated, freed or copied.
    fn reverse(&mut self);

    /// Releases every element, leaving an empty queue.
    fn clear(&mut self);
}
