//! The event queue: FIFO, dispatcher and registry surface.

use crate::fault_channel::{self, fault_payload, invariant_violation, log_fault};
use crate::registry::{Dispatch, Registry};
use kiln_event::{Category, EventHandler, Payload, QueueFault};
use kiln_types::{CategoryId, EventId};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// One pending event.
struct QueueEntry {
    event: EventId,
    payload: Payload,
}

struct Inner {
    registry: Registry,
    fifo: VecDeque<QueueEntry>,
}

/// An in-process event queue with category-based dispatch.
///
/// A single FIFO decouples event producers from consumers. Producers call
/// [`push`](Self::push) from any thread; one consumer thread drains the
/// queue with [`tick`](Self::tick) (typically once per frame). Each drained
/// entry is dispatched to every registered [`Category`] watching its event
/// id, invoking that category's handlers in registration order.
///
/// # Fault Channel
///
/// The queue reports its own recoverable failures ([`QueueFault`]) by
/// re-injecting them as entries on [`EventId::FAULT`], watched by the
/// permanent fault channel category ([`CategoryId::FAULT_CHANNEL`]). The
/// drain loop continues until the queue is empty, so a failure is logged
/// within the same `tick` call that produced it (timeout permitting).
/// Failures never surface through the return values of `push` or `tick`.
///
/// # Locking
///
/// One mutex protects the registry and the FIFO. It is acquired per push
/// and per drained entry — and released while handlers run, so handlers
/// may freely call [`push`](Self::push) (or any registry operation) on the
/// queue that invoked them.
///
/// # Example
///
/// ```
/// use kiln_event::{Category, Payload};
/// use kiln_queue::EventQueue;
/// use kiln_types::{CategoryId, EventId};
///
/// const WINDOW_CLOSED: EventId = EventId::new(0x10);
///
/// let queue = EventQueue::new();
/// queue.insert_category(
///     Category::new(CategoryId::new(1), "window")
///         .watch(WINDOW_CLOSED)
///         .handler(|_, _: &Payload, _: &Payload| Ok(())),
/// );
///
/// queue.push_bytes(WINDOW_CLOSED, &[]);
/// assert_eq!(queue.tick(), 1);
/// ```
pub struct EventQueue {
    inner: Mutex<Inner>,
}

impl EventQueue {
    /// Creates an empty queue with the fault channel pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::new();
        let inserted = registry.insert(fault_channel::category(), Payload::Empty);
        debug_assert!(inserted, "fresh registry must accept the fault channel");

        Self {
            inner: Mutex::new(Inner {
                registry,
                fifo: VecDeque::new(),
            }),
        }
    }

    // === Queue ===

    /// Pushes an event onto the back of the FIFO.
    ///
    /// Thread-safe against concurrent pushers and a concurrently running
    /// drain. Ownership of the payload bytes follows the [`Payload`]
    /// variant: [`Payload::copy_of`] gives the queue its own copy, released
    /// once the entry is fully processed; [`Payload::shared`] keeps the
    /// caller's allocation alive through the `Arc`.
    pub fn push(&self, event: EventId, payload: Payload) {
        trace!(event = %event, size = payload.len(), "push");
        self.inner.lock().fifo.push_back(QueueEntry { event, payload });
    }

    /// Pushes an event carrying a deep copy of `data`.
    ///
    /// The caller may mutate or free its buffer as soon as this returns.
    pub fn push_bytes(&self, event: EventId, data: &[u8]) {
        self.push(event, Payload::copy_of(data));
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().fifo.len()
    }

    /// Returns `true` if no entries are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().fifo.is_empty()
    }

    // === Dispatch ===

    /// Drains the queue until empty, invoking handlers.
    ///
    /// Equivalent to [`tick_for`](Self::tick_for) with an unbounded
    /// timeout; bounded only by how fast pushes outrun the drain.
    pub fn tick(&self) -> usize {
        self.tick_for(Duration::MAX)
    }

    /// Drains the queue until empty or `timeout` elapsed, invoking handlers.
    ///
    /// For each popped entry, every category watching its event id runs all
    /// of its handlers in registration order, receiving the entry payload
    /// and the category's user data. An entry matched by no category raises
    /// [`QueueFault::CategoryNotFound`]; a handler failure raises
    /// [`QueueFault::HandlerReturn`]. Both are re-queued on the fault
    /// channel and processed within this same drain loop.
    ///
    /// The timeout is checked between entries only: a drain cannot be
    /// cancelled mid-entry, and remaining entries stay queued for the next
    /// tick.
    ///
    /// Returns the number of (entry × matching category) dispatches — an
    /// entry matched by three categories contributes three, and a processed
    /// fault entry contributes one for the fault channel itself. This is
    /// not "entries drained".
    ///
    /// # Panics
    ///
    /// Panics if the fault channel category is missing when a fault entry
    /// is popped — an internal invariant violation.
    pub fn tick_for(&self, timeout: Duration) -> usize {
        let started = Instant::now();
        let mut count = 0;

        loop {
            // Phase one: pop and snapshot the matching categories under
            // the lock. Handlers run against the snapshot after release.
            let popped = {
                let mut inner = self.inner.lock();
                inner.fifo.pop_front().map(|entry| {
                    let matches = inner.registry.snapshot_watchers(entry.event);
                    (entry, matches)
                })
            };
            let Some((entry, matches)) = popped else {
                break;
            };

            trace!(event = %entry.event, watchers = matches.len(), "tick: pop");

            if matches.is_empty() {
                if entry.event == EventId::FAULT {
                    invariant_violation("fault channel category is not registered");
                }
                self.raise(QueueFault::CategoryNotFound { event: entry.event });
            } else {
                count += self.dispatch(&entry, &matches);
            }
            // Entry dropped here: an owned payload copy is released now.

            let elapsed = started.elapsed();
            if elapsed > timeout {
                trace!(?elapsed, pending = self.len(), "tick: timeout, stopping drain");
                break;
            }
        }

        count
    }

    /// Phase two: runs the snapshot's handlers with the lock released.
    fn dispatch(&self, entry: &QueueEntry, matches: &[Dispatch]) -> usize {
        for target in matches {
            trace!(
                event = %entry.event,
                category = %target.id,
                name = %target.name,
                handlers = target.handlers.len(),
                "tick: dispatch",
            );
            for handler in &target.handlers {
                if let Err(code) = handler.invoke(entry.event, &entry.payload, &target.data) {
                    self.raise(QueueFault::HandlerReturn {
                        category: target.id,
                        name: target.name.clone(),
                        event: entry.event,
                        code,
                    });
                }
            }
        }
        matches.len()
    }

    /// Re-injects a fault as a queue entry on the fault channel.
    fn raise(&self, fault: QueueFault) {
        self.push(EventId::FAULT, fault_payload(&fault));
    }

    // === Category registry ===

    /// Inserts a category without user data.
    ///
    /// Returns `false` only if the category's id is already registered.
    /// A duplicate *name* still succeeds but logs a warning; name lookup
    /// for that name becomes "first match in id order".
    pub fn insert_category(&self, category: Category) -> bool {
        self.insert_category_with(category, Payload::Empty)
    }

    /// Inserts a category with user data handed to every handler call.
    pub fn insert_category_with(&self, category: Category, data: Payload) -> bool {
        self.inner.lock().registry.insert(category, data)
    }

    /// Removes a category, its handler list and its user data.
    ///
    /// Returns `false` if the id is not registered or is the fault
    /// channel's reserved id (that category is un-removable).
    pub fn remove_category(&self, id: CategoryId) -> bool {
        self.inner.lock().registry.remove(id)
    }

    /// First category with the given name, in ascending id order.
    #[must_use]
    pub fn find_category(&self, name: &str) -> Option<CategoryId> {
        self.inner.lock().registry.find_by_name(name)
    }

    /// Every category watching `event`.
    #[must_use]
    pub fn find_categories(&self, event: EventId) -> Vec<CategoryId> {
        self.inner.lock().registry.watchers(event)
    }

    /// Smallest category id >= `start` not currently registered.
    ///
    /// Lets producers self-allocate non-colliding ids without a central
    /// counter:
    ///
    /// ```
    /// use kiln_queue::EventQueue;
    /// use kiln_types::CategoryId;
    ///
    /// let queue = EventQueue::new();
    /// let id = queue.next_free_category(CategoryId::new(0));
    /// assert_eq!(id, CategoryId::new(0));
    /// ```
    #[must_use]
    pub fn next_free_category(&self, start: CategoryId) -> CategoryId {
        self.inner.lock().registry.next_free(start)
    }

    /// Adds `event` to the category's watched set.
    ///
    /// Returns `false` if the category is absent or already watches it.
    pub fn watch_event(&self, id: CategoryId, event: EventId) -> bool {
        self.inner.lock().registry.watch(id, event)
    }

    /// Removes `event` from the category's watched set.
    pub fn unwatch_event(&self, id: CategoryId, event: EventId) -> bool {
        self.inner.lock().registry.unwatch(id, event)
    }

    /// Appends a handler to a category, returning its index.
    ///
    /// Handlers are invoked in registration order. Returns `None` if the
    /// category does not exist.
    pub fn register_handler(
        &self,
        id: CategoryId,
        handler: Arc<dyn EventHandler>,
    ) -> Option<usize> {
        self.inner.lock().registry.append_handler(id, handler)
    }

    /// Removes the handler at `index` from a category.
    pub fn remove_handler(&self, id: CategoryId, index: usize) -> bool {
        self.inner.lock().registry.remove_handler(id, index)
    }

    /// Removes every handler from a category.
    pub fn clear_handlers(&self, id: CategoryId) -> bool {
        self.inner.lock().registry.clear_handlers(id)
    }

    /// Removes and returns a category's last handler.
    pub fn pop_handler(&self, id: CategoryId) -> Option<Arc<dyn EventHandler>> {
        self.inner.lock().registry.pop_handler(id)
    }

    /// Removes and returns a category's handler at `index`.
    pub fn pop_handler_at(&self, id: CategoryId, index: usize) -> Option<Arc<dyn EventHandler>> {
        self.inner.lock().registry.pop_handler_at(id, index)
    }

    /// Number of registered categories, fault channel included.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.inner.lock().registry.len()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventQueue {
    /// Drains residual entries without invoking ordinary handlers.
    ///
    /// Each still-pending entry is logged directly as
    /// [`QueueFault::QueueNotEmpty`] (per live watching category) or
    /// [`QueueFault::QueueNotEmptyNoCategory`], so "you forgot to drain
    /// the queue" is surfaced without firing handler side effects during
    /// shutdown. Owned payload copies drop afterwards.
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        while let Some(entry) = inner.fifo.pop_front() {
            let watchers = inner.registry.watchers(entry.event);
            if watchers.is_empty() {
                log_fault(&QueueFault::QueueNotEmptyNoCategory { event: entry.event });
            }
            for id in watchers {
                if let Some(record) = inner.registry.get(id) {
                    log_fault(&QueueFault::QueueNotEmpty {
                        category: id,
                        name: record.category.name.clone(),
                        event: entry.event,
                    });
                }
            }
        }
    }
}
