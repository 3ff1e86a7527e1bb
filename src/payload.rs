use std::alloc::{self, Layout};

use crate::error::{QueueError, Result};

/// Moves `value` into a fresh heap allocation, reporting allocator failure
/// instead of aborting the process.
pub(crate) fn try_box<T>(value: T) -> Result<Box<T>> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }
    // SAFETY: the layout has a non-zero size.
    let ptr = unsafe { alloc::alloc(layout) } as *mut T;
    if ptr.is_null() {
        return Err(QueueError::AllocationFailure);
    }
    // SAFETY: `ptr` was returned by the global allocator for `Layout::new::<T>()`,
    // which is exactly the memory layout `Box<T>` expects to own.
    unsafe {
        ptr.write(value);
        Ok(Box::from_raw(ptr))
    }
}

/// A queue element's own copy of a string, stored with its terminating NUL.
///
/// The copy is sized to fit exactly, so even the empty string owns a one
/// byte allocation.
pub struct Payload(Box<str>);

impl Payload {
    pub fn try_copy(s: &str) -> Result<Self> {
        let mut buf = String::new();
        buf.try_reserve_exact(s.len() + 1)
            .map_err(|_| QueueError::AllocationFailure)?;
        buf.push_str(s);
        buf.push('\0');
        Ok(Self(buf.into_boxed_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0[..self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies at most `out.len() - 1` bytes into `out` and zero-fills the
    /// rest, so `out` always ends with a terminator. Longer strings are
    /// silently truncated. An empty `out` is left alone.
    pub fn copy_truncated(&self, out: &mut [u8]) {
        let Some(last) = out.len().checked_sub(1) else {
            return;
        };
        let bytes = self.as_str().as_bytes();
        let n = bytes.len().min(last);
        out[..n].copy_from_slice(&bytes[..n]);
        out[n..].fill(0);
    }

    pub fn into_string(self) -> String {
        let mut s = String::from(self.0);
        s.pop();
        s
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod test {
    use super::{try_box, Payload};

    #[test]
    fn copy_is_independent_of_source() {
        let mut source = String::from("hello");
        let payload = Payload::try_copy(&source).unwrap();
        source.push_str(" world");
        assert_eq!(payload.as_str(), "hello");
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn empty_string() {
        let payload = Payload::try_copy("").unwrap();
        assert!(payload.is_empty());
        assert_eq!(payload.into_string(), "");
    }

    #[test]
    fn copy_fits() {
        let payload = Payload::try_copy("abc").unwrap();
        let mut out = [0xffu8; 6];
        payload.copy_truncated(&mut out);
        assert_eq!(&out, b"abc\0\0\0");
    }

    #[test]
    fn copy_exactly_fills_buffer() {
        let payload = Payload::try_copy("abc").unwrap();
        let mut out = [0xffu8; 4];
        payload.copy_truncated(&mut out);
        assert_eq!(&out, b"abc\0");
    }

    #[test]
    fn copy_truncates() {
        let payload = Payload::try_copy("abcdefgh").unwrap();
        let mut out = [0xffu8; 4];
        payload.copy_truncated(&mut out);
        assert_eq!(&out, b"abc\0");
    }

    #[test]
    fn single_byte_buffer_only_holds_terminator() {
        let payload = Payload::try_copy("abc").unwrap();
        let mut out = [0xffu8; 1];
        payload.copy_truncated(&mut out);
        assert_eq!(out, [0]);
    }

    #[test]
    fn empty_buffer_untouched() {
        let payload = Payload::try_copy("abc").unwrap();
        let mut out: [u8; 0] = [];
        payload.copy_truncated(&mut out);
    }

    #[test]
    fn into_string_drops_terminator() {
        let payload = Payload::try_copy("queue").unwrap();
        assert_eq!(payload.into_string(), "queue");
    }

    #[test]
    fn try_box_holds_value() {
        let boxed = try_box(42u64).unwrap();
        assert_eq!(*boxed, 42);
        let _unit: Box<()> = try_box(()).unwrap();
    }
}
