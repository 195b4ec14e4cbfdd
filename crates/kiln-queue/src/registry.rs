//! Category registry.
//!
//! Pure data + CRUD over a `BTreeMap<CategoryId, CategoryRecord>`; the
//! registry has no knowledge of the queue. [`EventQueue`](crate::EventQueue)
//! wraps it behind the dispatch lock and exposes each operation.
//!
//! The map is ordered so that name lookup and the free-id scan are
//! deterministic (ascending id order).

use kiln_event::{Category, EventHandler, Payload};
use kiln_types::{CategoryId, EventId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// A registered category plus its user data payload.
pub(crate) struct CategoryRecord {
    pub category: Category,
    /// Per-category user data, handed to every handler invocation.
    pub data: Payload,
}

/// Snapshot of one matching category, taken under the dispatch lock and
/// used after it is released.
pub(crate) struct Dispatch {
    pub id: CategoryId,
    pub name: String,
    pub handlers: Vec<Arc<dyn EventHandler>>,
    pub data: Payload,
}

#[derive(Default)]
pub(crate) struct Registry {
    map: BTreeMap<CategoryId, CategoryRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a category record.
    ///
    /// Fails only when the id is already taken. A name collision still
    /// succeeds but is warned about: name lookup for that name degrades to
    /// "first match in id order".
    pub fn insert(&mut self, category: Category, data: Payload) -> bool {
        if self.map.contains_key(&category.id) {
            return false;
        }

        if let Some(existing) = self
            .map
            .values()
            .find(|record| record.category.name == category.name)
        {
            warn!(
                "category {:?} (id {}) has the same name as category {:?} (id {}), \
                 name lookup for {:?} will be unpredictable",
                category.name,
                category.id,
                existing.category.name,
                existing.category.id,
                category.name,
            );
        }

        self.map
            .insert(category.id, CategoryRecord { category, data });
        true
    }

    /// Removes a category, dropping its user data and handler list.
    ///
    /// The fault channel's reserved id is rejected; that category lives as
    /// long as the registry.
    pub fn remove(&mut self, id: CategoryId) -> bool {
        if id == CategoryId::FAULT_CHANNEL {
            warn!("refusing to remove the fault channel category");
            return false;
        }
        self.map.remove(&id).is_some()
    }

    pub fn get(&self, id: CategoryId) -> Option<&CategoryRecord> {
        self.map.get(&id)
    }

    /// First category with the given name, in ascending id order.
    pub fn find_by_name(&self, name: &str) -> Option<CategoryId> {
        self.map
            .values()
            .find(|record| record.category.name == name)
            .map(|record| record.category.id)
    }

    /// Every category watching `event`.
    pub fn watchers(&self, event: EventId) -> Vec<CategoryId> {
        self.map
            .values()
            .filter(|record| record.category.watches(event))
            .map(|record| record.category.id)
            .collect()
    }

    /// Dispatch snapshots for every category watching `event`.
    pub fn snapshot_watchers(&self, event: EventId) -> Vec<Dispatch> {
        self.map
            .values()
            .filter(|record| record.category.watches(event))
            .map(|record| Dispatch {
                id: record.category.id,
                name: record.category.name.clone(),
                handlers: record.category.handlers.clone(),
                data: record.data.clone(),
            })
            .collect()
    }

    /// Smallest id >= `start` with no category registered.
    ///
    /// Keys are sorted, so consecutive occupied ids can be skipped in one
    /// ordered pass instead of a lookup per candidate.
    pub fn next_free(&self, start: CategoryId) -> CategoryId {
        let mut candidate = start;
        for &id in self.map.range(start..).map(|(id, _)| id) {
            if id != candidate {
                break;
            }
            candidate = candidate.next();
        }
        candidate
    }

    pub fn watch(&mut self, id: CategoryId, event: EventId) -> bool {
        match self.map.get_mut(&id) {
            Some(record) => record.category.events.insert(event),
            None => false,
        }
    }

    pub fn unwatch(&mut self, id: CategoryId, event: EventId) -> bool {
        match self.map.get_mut(&id) {
            Some(record) => record.category.events.remove(&event),
            None => false,
        }
    }

    /// Appends a handler, returning its index in the category's list.
    pub fn append_handler(
        &mut self,
        id: CategoryId,
        handler: Arc<dyn EventHandler>,
    ) -> Option<usize> {
        let Some(record) = self.map.get_mut(&id) else {
            warn!("append_handler: category id {id} does not exist");
            return None;
        };
        record.category.handlers.push(handler);
        Some(record.category.handlers.len() - 1)
    }

    pub fn remove_handler(&mut self, id: CategoryId, index: usize) -> bool {
        let Some(record) = self.map.get_mut(&id) else {
            warn!("remove_handler: category id {id} does not exist");
            return false;
        };
        if index >= record.category.handlers.len() {
            warn!("remove_handler: handler index {index} is out-of-range");
            return false;
        }
        record.category.handlers.remove(index);
        true
    }

    pub fn clear_handlers(&mut self, id: CategoryId) -> bool {
        let Some(record) = self.map.get_mut(&id) else {
            warn!("clear_handlers: category id {id} does not exist");
            return false;
        };
        record.category.handlers.clear();
        true
    }

    /// Removes and returns the last handler.
    pub fn pop_handler(&mut self, id: CategoryId) -> Option<Arc<dyn EventHandler>> {
        let record = self.map.get_mut(&id)?;
        record.category.handlers.pop()
    }

    /// Removes and returns the handler at `index`.
    pub fn pop_handler_at(&mut self, id: CategoryId, index: usize) -> Option<Arc<dyn EventHandler>> {
        let record = self.map.get_mut(&id)?;
        if index >= record.category.handlers.len() {
            warn!("pop_handler_at: handler index {index} is out-of-range");
            return None;
        }
        Some(record.category.handlers.remove(index))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_event::HandlerResult;

    fn ok_handler() -> Arc<dyn EventHandler> {
        Arc::new(|_: EventId, _: &Payload, _: &Payload| -> HandlerResult { Ok(()) })
    }

    fn category(id: i64, name: &str) -> Category {
        Category::new(CategoryId::new(id), name)
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut registry = Registry::new();
        assert!(registry.insert(category(1, "a").watch(EventId::new(9)), Payload::Empty));

        // Same id again: rejected, existing record untouched.
        assert!(!registry.insert(category(1, "b"), Payload::Empty));
        let record = registry.get(CategoryId::new(1)).unwrap();
        assert_eq!(record.category.name, "a");
        assert!(record.category.watches(EventId::new(9)));
    }

    #[test]
    fn insert_accepts_duplicate_name() {
        let mut registry = Registry::new();
        assert!(registry.insert(category(1, "dup"), Payload::Empty));
        assert!(registry.insert(category(2, "dup"), Payload::Empty));

        // Name lookup degrades to first match in id order.
        assert_eq!(registry.find_by_name("dup"), Some(CategoryId::new(1)));
    }

    #[test]
    fn remove_drops_record() {
        let mut registry = Registry::new();
        registry.insert(category(1, "a"), Payload::copy_of(b"data"));

        assert!(registry.remove(CategoryId::new(1)));
        assert!(registry.get(CategoryId::new(1)).is_none());
        assert!(!registry.remove(CategoryId::new(1)));
    }

    #[test]
    fn remove_refuses_fault_channel_id() {
        let mut registry = Registry::new();
        registry.insert(
            Category::new(CategoryId::FAULT_CHANNEL, "queue-fault"),
            Payload::Empty,
        );

        assert!(!registry.remove(CategoryId::FAULT_CHANNEL));
        assert!(registry.get(CategoryId::FAULT_CHANNEL).is_some());
    }

    #[test]
    fn watchers_returns_all_matching() {
        let mut registry = Registry::new();
        let event = EventId::new(0x20);
        registry.insert(category(1, "a").watch(event), Payload::Empty);
        registry.insert(category(2, "b").watch(event), Payload::Empty);
        registry.insert(category(3, "c").watch(EventId::new(0x21)), Payload::Empty);

        let watchers = registry.watchers(event);
        assert_eq!(watchers, vec![CategoryId::new(1), CategoryId::new(2)]);
        assert!(registry.watchers(EventId::new(0x99)).is_empty());
    }

    #[test]
    fn next_free_skips_occupied_run() {
        let mut registry = Registry::new();
        for id in [5, 6, 8] {
            registry.insert(category(id, "x"), Payload::Empty);
        }

        assert_eq!(registry.next_free(CategoryId::new(5)), CategoryId::new(7));

        registry.insert(category(7, "x"), Payload::Empty);
        assert_eq!(registry.next_free(CategoryId::new(5)), CategoryId::new(9));
        assert_eq!(registry.next_free(CategoryId::new(0)), CategoryId::new(0));
    }

    #[test]
    fn watch_unwatch_mutate_set() {
        let mut registry = Registry::new();
        let id = CategoryId::new(1);
        let event = EventId::new(0x20);
        registry.insert(category(1, "a"), Payload::Empty);

        assert!(registry.watch(id, event));
        assert!(!registry.watch(id, event)); // already watched
        assert!(registry.unwatch(id, event));
        assert!(!registry.unwatch(id, event)); // already gone

        assert!(!registry.watch(CategoryId::new(9), event));
        assert!(!registry.unwatch(CategoryId::new(9), event));
    }

    #[test]
    fn handler_list_mutation() {
        let mut registry = Registry::new();
        let id = CategoryId::new(1);
        registry.insert(category(1, "a"), Payload::Empty);

        assert_eq!(registry.append_handler(id, ok_handler()), Some(0));
        assert_eq!(registry.append_handler(id, ok_handler()), Some(1));
        assert_eq!(registry.append_handler(CategoryId::new(9), ok_handler()), None);

        assert!(registry.remove_handler(id, 1));
        assert!(!registry.remove_handler(id, 5));
        assert!(registry.clear_handlers(id));
        assert_eq!(registry.get(id).unwrap().category.handlers.len(), 0);
        assert!(!registry.clear_handlers(CategoryId::new(9)));
    }

    #[test]
    fn pop_handler_removes_from_list() {
        let mut registry = Registry::new();
        let id = CategoryId::new(1);
        registry.insert(category(1, "a"), Payload::Empty);
        registry.append_handler(id, ok_handler());
        registry.append_handler(id, ok_handler());

        assert!(registry.pop_handler(id).is_some());
        assert!(registry.pop_handler_at(id, 0).is_some());
        assert!(registry.pop_handler(id).is_none());
        assert!(registry.pop_handler_at(id, 0).is_none());
        assert!(registry.pop_handler(CategoryId::new(9)).is_none());
    }

    #[test]
    fn snapshot_clones_handlers_and_data() {
        let mut registry = Registry::new();
        let event = EventId::new(0x20);
        registry.insert(
            category(1, "a").watch(event).handler_arc(ok_handler()),
            Payload::copy_of(b"user-data"),
        );

        let snapshots = registry.snapshot_watchers(event);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].name, "a");
        assert_eq!(snapshots[0].handlers.len(), 1);
        assert_eq!(snapshots[0].data.as_bytes(), b"user-data");
    }
}
