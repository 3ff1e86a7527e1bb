use std::{fmt, mem};

use crate::{
    error::{QueueError, Result},
    payload::Payload,
    StringQueue,
};

type Index = usize;

enum Slot {
    Occupied {
        payload: Payload,
        next: Option<Index>,
    },
    Vacant {
        next_free: Option<Index>,
    },
}

/// String queue whose nodes live in a slot vector and link to each other
/// by index.
///
/// Removed slots are threaded onto a free list and reused by later inserts,
/// so the vector only grows when every slot is occupied.
pub struct ArenaQueue {
    slots: Vec<Slot>,
    free: Option<Index>,
    head: Option<Index>,
    tail: Option<Index>,
    len: usize,
}

impl ArenaQueue {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of slots held, occupied or not.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Claims a slot for a copy of `s`. Nothing is modified on failure.
    fn alloc(&mut self, s: &str, next: Option<Index>) -> Result<Index> {
        let payload = Payload::try_copy(s)
            .inspect_err(|_| tracing::debug!(len = s.len(), "payload allocation failed"))?;
        let slot = Slot::Occupied { payload, next };
        match self.free {
            Some(index) => {
                let old = mem::replace(&mut self.slots[index], slot);
                let Slot::Vacant { next_free } = old else {
                    unreachable!("free list points at an occupied slot");
                };
                self.free = next_free;
                Ok(index)
            }
            None => {
                self.slots.try_reserve(1).map_err(|_| {
                    tracing::debug!(slots = self.slots.len(), "slot allocation failed");
                    QueueError::AllocationFailure
                })?;
                self.slots.push(slot);
                Ok(self.slots.len() - 1)
            }
        }
    }

    fn set_next(&mut self, index: Index, link: Option<Index>) {
        if let Slot::Occupied { next, .. } = &mut self.slots[index] {
            *next = link;
        }
    }

    fn next_of(&self, index: Index) -> Option<Index> {
        match &self.slots[index] {
            Slot::Occupied { next, .. } => *next,
            Slot::Vacant { .. } => None,
        }
    }

    /// Detaches the head element and returns its slot to the free list.
    fn unlink_head(&mut self) -> Option<Payload> {
        let head = self.head?;
        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        let Slot::Occupied { payload, next } = mem::replace(&mut self.slots[head], vacant) else {
            unreachable!("head points at a vacant slot");
        };
        self.free = Some(head);
        self.head = next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(payload)
    }

    fn payloads(&self) -> impl Iterator<Item = &Payload> + '_ {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let index = current?;
            match &self.slots[index] {
                Slot::Occupied { payload, next } => {
                    current = *next;
                    Some(payload)
                }
                Slot::Vacant { .. } => None,
            }
        })
    }
}

impl Default for ArenaQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl StringQueue for ArenaQueue {
    fn insert_head(&mut self, s: &str) -> Result<()> {
        let index = self.alloc(s, self.head)?;
        if self.tail.is_none() {
            self.tail = Some(index);
        }
        self.head = Some(index);
        self.len += 1;
        Ok(())
    }

    fn insert_tail(&mut self, s: &str) -> Result<()> {
        let index = self.alloc(s, None)?;
        match self.tail {
            Some(tail) => self.set_next(tail, Some(index)),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
        Ok(())
    }

    fn remove_head(&mut self, out: Option<&mut [u8]>) -> Result<()> {
        let Some(payload) = self.unlink_head() else {
            tracing::trace!("remove_head on empty queue");
            return Err(QueueError::Empty);
        };
        if let Some(out) = out {
            payload.copy_truncated(out);
        }
        Ok(())
    }

    fn pop_head(&mut self) -> Result<String> {
        self.unlink_head()
            .map(Payload::into_string)
            .ok_or(QueueError::Empty)
    }

    fn size(&self) -> usize {
        self.len
    }

    fn reverse(&mut self) {
        let mut prev = None;
        let mut current = self.head;
        while let Some(index) = current {
            let next = self.next_of(index);
            self.set_next(index, prev);
            prev = Some(index);
            current = next;
        }
        self.tail = self.head;
        self.head = prev;
        tracing::trace!(len = self.len, "reversed");
    }

    fn clear(&mut self) {
        tracing::trace!(len = self.len, slots = self.slots.len(), "clearing");
        self.slots.clear();
        self.free = None;
        self.head = None;
        self.tail = None;
        self.len = 0;
    }
}

impl fmt::Debug for ArenaQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.payloads()).finish()
    }
}
