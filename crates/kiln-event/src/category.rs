//! Event categories for watch-based dispatch.
//!
//! A category groups a set of watched event ids with an ordered list of
//! handlers. During a tick, every category watching a popped entry's id
//! runs all of its handlers in registration order — dispatch has no
//! "first match wins"; only name lookup does.
//!
//! # Naming
//!
//! Category ids are unique in the registry (map-key semantics). Names are
//! advisory: duplicates are accepted with a warning, and name lookup then
//! degrades to "first match encountered".

use crate::EventHandler;
use kiln_types::{CategoryId, EventId};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A named grouping of watched event ids plus an ordered handler list.
///
/// # Example
///
/// ```
/// use kiln_event::{Category, Payload};
/// use kiln_types::{CategoryId, EventId};
///
/// const WINDOW_CLOSED: EventId = EventId::new(0x10);
/// const WINDOW_RESIZED: EventId = EventId::new(0x11);
///
/// let window = Category::new(CategoryId::new(2), "window")
///     .watch(WINDOW_CLOSED)
///     .watch(WINDOW_RESIZED)
///     .handler(|_, _: &Payload, _: &Payload| Ok(()));
///
/// assert!(window.watches(WINDOW_CLOSED));
/// assert_eq!(window.handlers.len(), 1);
/// ```
#[derive(Clone)]
pub struct Category {
    /// Unique id, the registry map key.
    pub id: CategoryId,
    /// Advisory name for lookup; not required to be unique.
    pub name: String,
    /// Watched event ids.
    pub events: BTreeSet<EventId>,
    /// Handlers in registration order.
    pub handlers: Vec<Arc<dyn EventHandler>>,
}

impl Category {
    /// Creates an empty category with the given id and name.
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            events: BTreeSet::new(),
            handlers: Vec::new(),
        }
    }

    /// Adds an event id to the watched set (builder style).
    #[must_use]
    pub fn watch(mut self, event: EventId) -> Self {
        self.events.insert(event);
        self
    }

    /// Appends a handler to the ordered list (builder style).
    #[must_use]
    pub fn handler(mut self, handler: impl EventHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Appends an already shared handler (builder style).
    #[must_use]
    pub fn handler_arc(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Returns `true` if this category watches `event`.
    #[must_use]
    pub fn watches(&self, event: EventId) -> bool {
        self.events.contains(&event)
    }
}

impl std::fmt::Debug for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Category")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("events", &self.events)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
