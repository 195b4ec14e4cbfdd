//! Opaque event payloads.
//!
//! A payload is a byte blob the queue passes to handlers untouched. The
//! variants encode the two ownership policies of the queue:
//!
//! - [`Payload::Owned`] — the queue's own deep copy, taken at push time and
//!   released exactly once when the entry (or category record) is dropped.
//!   The pusher may reuse or free its original buffer immediately.
//! - [`Payload::Shared`] — shared ownership of caller memory through an
//!   `Arc`; no copy is taken, the bytes stay alive as long as any clone of
//!   the `Arc` does.

use bytes::Bytes;
use std::sync::Arc;

/// Opaque byte payload attached to a queue entry or category.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No data.
    #[default]
    Empty,
    /// Deep copy owned by the queue.
    Owned(Bytes),
    /// Caller memory shared through an `Arc`, no copy taken.
    Shared(Arc<[u8]>),
}

impl Payload {
    /// Creates an owned deep copy of `data`.
    ///
    /// An empty slice maps to [`Payload::Empty`] — the "no data" case.
    ///
    /// # Example
    ///
    /// ```
    /// use kiln_event::Payload;
    ///
    /// let mut buffer = vec![1u8, 2, 3];
    /// let payload = Payload::copy_of(&buffer);
    ///
    /// // The pusher is free to reuse its buffer.
    /// buffer.clear();
    /// assert_eq!(payload.as_bytes(), &[1, 2, 3]);
    /// ```
    #[must_use]
    pub fn copy_of(data: &[u8]) -> Self {
        if data.is_empty() {
            Self::Empty
        } else {
            Self::Owned(Bytes::copy_from_slice(data))
        }
    }

    /// Wraps already shared caller memory without copying.
    #[must_use]
    pub fn shared(data: Arc<[u8]>) -> Self {
        Self::Shared(data)
    }

    /// Returns the payload bytes; empty slice for [`Payload::Empty`].
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Owned(bytes) => bytes,
            Self::Shared(arc) => arc,
        }
    }

    /// Returns `true` if the payload carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        if data.is_empty() {
            Self::Empty
        } else {
            Self::Owned(Bytes::from(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_of_owns_a_copy() {
        let mut buffer = vec![0xde, 0xad, 0xbe, 0xef];
        let payload = Payload::copy_of(&buffer);

        buffer.iter_mut().for_each(|b| *b = 0);
        drop(buffer);

        assert_eq!(payload.as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(payload.len(), 4);
    }

    #[test]
    fn empty_slice_maps_to_empty() {
        assert!(matches!(Payload::copy_of(&[]), Payload::Empty));
        assert!(matches!(Payload::from(Vec::new()), Payload::Empty));
        assert!(Payload::Empty.is_empty());
        assert_eq!(Payload::Empty.as_bytes(), &[] as &[u8]);
    }

    #[test]
    fn shared_aliases_without_copy() {
        let data: Arc<[u8]> = Arc::from(&b"alias"[..]);
        let payload = Payload::shared(Arc::clone(&data));

        assert_eq!(payload.as_bytes(), b"alias");
        // Both the caller and the payload hold the allocation.
        assert_eq!(Arc::strong_count(&data), 2);
    }

    #[test]
    fn clone_is_cheap_and_equal() {
        let payload = Payload::copy_of(b"clone me");
        let cloned = payload.clone();
        assert_eq!(payload.as_bytes(), cloned.as_bytes());
    }
}
