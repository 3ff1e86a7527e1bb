use std::{fmt, marker::PhantomData, ptr::NonNull};

use crate::{
    error::{QueueError, Result},
    payload::{try_box, Payload},
    StringQueue,
};

type Link = Option<NonNull<Node>>;

struct Node {
    payload: Payload,
    next: Link,
}

/// Singly-linked string queue.
///
/// Nodes are leaked boxes linked through raw pointers. Each node owns the
/// chain starting at its `next`, and the queue owns the chain starting at
/// `head`; `tail` is a non-owning shortcut to the last node.
pub struct LinkedQueue {
    head: Link,
    tail: Link,
    len: usize,
    _owns: PhantomData<Box<Node>>,
}

// SAFETY: the queue is the sole owner of every node reachable from `head`,
// nothing else holds a pointer into the chain.
unsafe impl Send for LinkedQueue {}
unsafe impl Sync for LinkedQueue {}

impl LinkedQueue {
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            _owns: PhantomData,
        }
    }

    fn new_node(s: &str, next: Link) -> Result<NonNull<Node>> {
        let payload = Payload::try_copy(s)
            .inspect_err(|_| tracing::debug!(len = s.len(), "payload allocation failed"))?;
        let node = try_box(Node { payload, next })
            .inspect_err(|_| tracing::debug!("node allocation failed"))?;
        Ok(NonNull::from(Box::leak(node)))
    }

    /// Detaches the head node and hands its ownership to the caller.
    fn unlink_head(&mut self) -> Option<Box<Node>> {
        let head = self.head?;
        // SAFETY: `head` came from `Box::leak` in `new_node` and is owned by
        // the queue until this point; it is unlinked before being returned.
        let node = unsafe { Box::from_raw(head.as_ptr()) };
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(node)
    }

    fn payloads(&self) -> Payloads<'_> {
        Payloads {
            current: self.head,
            _queue: PhantomData,
        }
    }
}

impl Default for LinkedQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl StringQueue for LinkedQueue {
    fn insert_head(&mut self, s: &str) -> Result<()> {
        let node = Self::new_node(s, self.head)?;
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    fn insert_tail(&mut self, s: &str) -> Result<()> {
        let node = Self::new_node(s, None)?;
        match self.tail {
            // SAFETY: `tail` points at the last live node of the chain.
            Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    fn remove_head(&mut self, out: Option<&mut [u8]>) -> Result<()> {
        let Some(node) = self.unlink_head() else {
            tracing::trace!("remove_head on empty queue");
            return Err(QueueError::Empty);
        };
        if let Some(out) = out {
            node.payload.copy_truncated(out);
        }
        Ok(())
    }

    fn pop_head(&mut self) -> Result<String> {
        self.unlink_head()
            .map(|node| node.payload.into_string())
            .ok_or(QueueError::Empty)
    }

    fn size(&self) -> usize {
        self.len
    }

    fn reverse(&mut self) {
        let mut prev: Link = None;
        let mut current = self.head;
        while let Some(mut node) = current {
            // SAFETY: every node on the walk is live and owned by the queue;
            // the old next-link is read before it is overwritten.
            unsafe {
                let next = node.as_ref().next;
                node.as_mut().next = prev;
                prev = Some(node);
                current = next;
            }
        }
        self.tail = self.head;
        self.head = prev;
        tracing::trace!(len = self.len, "reversed");
    }

    fn clear(&mut self) {
        while self.unlink_head().is_some() {}
    }
}

impl Drop for LinkedQueue {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for LinkedQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.payloads()).finish()
    }
}

struct Payloads<'q> {
    current: Link,
    _queue: PhantomData<&'q LinkedQueue>,
}

impl<'q> Iterator for Payloads<'q> {
    type Item = &'q Payload;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            // SAFETY: the queue is borrowed for 'q, so no node is freed or
            // relinked while this walk is alive.
            let node = unsafe { &*node.as_ptr() };
            self.current = node.next;
            &node.payload
        })
    }
}
