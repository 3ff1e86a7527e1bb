//! Handle-level queue operations.
//!
//! A handle is an optionally present, heap-allocated queue. Every operation
//! accepts an absent handle and answers the way it would for a rejected
//! call: `false`, `0`, or nothing at all. Errors are reported through
//! return values only.

use crate::{payload::try_box, StringQueue};

/// Allocates a new empty queue, or `None` if its storage is unavailable.
pub fn create<Q: StringQueue + Default>() -> Option<Box<Q>> {
    try_box(Q::default())
        .inspect_err(|err| tracing::debug!(%err, "queue allocation failed"))
        .ok()
}

/// Releases the queue, every element's string and every node.
pub fn destroy<Q: StringQueue>(queue: Option<Box<Q>>) {
    drop(queue);
}

pub fn insert_head<Q: StringQueue>(queue: Option<&mut Q>, s: &str) -> bool {
    queue.is_some_and(|q| q.insert_head(s).is_ok())
}

pub fn insert_tail<Q: StringQueue>(queue: Option<&mut Q>, s: &str) -> bool {
    queue.is_some_and(|q| q.insert_tail(s).is_ok())
}

/// Removes the head element, copying its string into `out` (if given)
/// truncated and terminated to fit. `out` is not touched on failure.
pub fn remove_head<Q: StringQueue>(queue: Option<&mut Q>, out: Option<&mut [u8]>) -> bool {
    queue.is_some_and(|q| q.remove_head(out).is_ok())
}

pub fn size<Q: StringQueue>(queue: Option<&Q>) -> usize {
    queue.map_or(0, |q| q.size())
}

pub fn reverse<Q: StringQueue>(queue: Option<&mut Q>) {
    if let Some(q) = queue {
        q.reverse();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ArenaQueue, LinkedQueue};

    fn scenario<Q: StringQueue + Default>() {
        let mut q = create::<Q>();
        assert!(insert_tail(q.as_deref_mut(), "a"));
        assert!(insert_tail(q.as_deref_mut(), "b"));
        assert!(insert_head(q.as_deref_mut(), "c"));
        assert_eq!(size(q.as_deref()), 3);

        let mut out = [0u8; 4];
        assert!(remove_head(q.as_deref_mut(), Some(&mut out[..])));
        assert_eq!(&out, b"c\0\0\0");
        assert!(remove_head(q.as_deref_mut(), Some(&mut out[..])));
        assert_eq!(&out, b"a\0\0\0");

        reverse(q.as_deref_mut());
        assert_eq!(size(q.as_deref()), 1);
        assert!(remove_head(q.as_deref_mut(), Some(&mut out[..])));
        assert_eq!(&out, b"b\0\0\0");
        assert!(!remove_head(q.as_deref_mut(), None));
        destroy(q);
    }

    #[test]
    fn linked_scenario() {
        scenario::<LinkedQueue>();
    }

    #[test]
    fn arena_scenario() {
        scenario::<ArenaQueue>();
    }

    #[test]
    fn absent_handle() {
        let mut out = *b"keep";
        assert!(!insert_head::<LinkedQueue>(None, "x"));
        assert!(!insert_tail::<LinkedQueue>(None, "x"));
        assert!(!remove_head::<LinkedQueue>(None, Some(&mut out[..])));
        assert_eq!(&out, b"keep");
        assert_eq!(size::<LinkedQueue>(None), 0);
        reverse::<LinkedQueue>(None);
        destroy::<LinkedQueue>(None);
    }

    #[test]
    fn remove_without_buffer() {
        let mut q = create::<LinkedQueue>();
        assert!(insert_head(q.as_deref_mut(), "dropped"));
        assert!(remove_head(q.as_deref_mut(), None));
        assert!(insert_head(q.as_deref_mut(), "dropped"));
        let mut empty: [u8; 0] = [];
        assert!(remove_head(q.as_deref_mut(), Some(&mut empty[..])));
        assert_eq!(size(q.as_deref()), 0);
    }
}
