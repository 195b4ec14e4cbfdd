//! Identifier types for the Kiln event core.
//!
//! Both identifiers are integer newtypes rather than UUIDs: the queue is
//! strictly in-process, ids are chosen by the application (or allocated via
//! the registry's free-id scan), and the reserved sentinels are defined as
//! the maximum representable value of each domain.

use serde::{Deserialize, Serialize};

/// Identifier for a kind of event.
///
/// An `EventId` names an occurrence kind, not an occurrence: pushing the
/// same id twice yields two queue entries. Categories declare interest in
/// sets of event ids and receive every entry carrying one of them.
///
/// # Reserved Value
///
/// [`EventId::FAULT`] (`u64::MAX`) is permanently reserved for the queue's
/// internal fault events and must not be used by application code.
///
/// # Example
///
/// ```
/// use kiln_types::EventId;
///
/// const KEY_PRESSED: EventId = EventId::new(0x20);
///
/// assert_eq!(KEY_PRESSED.raw(), 0x20);
/// assert!(!KEY_PRESSED.is_reserved());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Reserved id for internal fault events.
    ///
    /// Entries with this id are watched by the fault channel category and
    /// carry a serialized fault description as their payload.
    pub const FAULT: EventId = EventId(u64::MAX);

    /// Creates an event id from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the reserved [`FAULT`](Self::FAULT) id.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 == u64::MAX
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Identifier for a registered event category.
///
/// # Reserved Value
///
/// [`CategoryId::FAULT_CHANNEL`] (`i64::MAX`) is permanently allocated to
/// the fault channel category, which is created with the queue and can
/// never be removed. Application categories must use other values; the
/// registry's free-id scan never returns it.
///
/// # Example
///
/// ```
/// use kiln_types::CategoryId;
///
/// let input = CategoryId::new(1);
///
/// assert_eq!(input.raw(), 1);
/// assert!(!input.is_reserved());
/// assert!(CategoryId::FAULT_CHANNEL.is_reserved());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(i64);

impl CategoryId {
    /// Reserved id of the permanent fault channel category.
    pub const FAULT_CHANNEL: CategoryId = CategoryId(i64::MAX);

    /// Creates a category id from its raw value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Returns the next id in the domain, saturating at the reserved value.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.0 >= i64::MAX - 1 {
            Self::FAULT_CHANNEL
        } else {
            Self(self.0 + 1)
        }
    }

    /// Returns `true` if this is the reserved
    /// [`FAULT_CHANNEL`](Self::FAULT_CHANNEL) id.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 == i64::MAX
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CategoryId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
