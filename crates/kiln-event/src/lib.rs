//! Event vocabulary for the Kiln event core.
//!
//! This crate defines the value types that flow through the queue:
//! opaque payloads, categories, handlers and the fault taxonomy.
//! It has no knowledge of the queue itself; `kiln-queue` builds the
//! dispatch machinery on top of these types.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  kiln-types : EventId, CategoryId, ErrorCode                │
//! │  kiln-event : Payload, Category, EventHandler  ◄── HERE     │
//! │  kiln-queue : EventQueue (registry, FIFO, tick, faults)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Dispatch Model
//!
//! ```text
//! producer ── push(EventId, Payload) ──► FIFO
//!                                          │ tick
//!                                          ▼
//!                      Category { events, handlers } (every watcher)
//!                                          │
//!                                          ▼
//!        handler.invoke(event, &payload, &category_data) -> Result<(), FaultCode>
//!                                          │ Err(code)
//!                                          ▼
//!                      QueueFault re-queued on EventId::FAULT
//! ```
//!
//! # Usage
//!
//! ```
//! use kiln_event::{Category, Payload};
//! use kiln_types::{CategoryId, EventId};
//!
//! const KEY_PRESSED: EventId = EventId::new(0x20);
//!
//! let input = Category::new(CategoryId::new(1), "input")
//!     .watch(KEY_PRESSED)
//!     .handler(|_, payload: &Payload, _: &Payload| {
//!         let _scancode = payload.as_bytes();
//!         Ok(())
//!     });
//!
//! assert_eq!(input.name, "input");
//! assert!(input.watches(KEY_PRESSED));
//! ```

mod category;
mod fault;
mod handler;
mod payload;

pub use category::Category;
pub use fault::QueueFault;
pub use handler::{EventHandler, FaultCode, HandlerResult};
pub use payload::Payload;

// Re-export from kiln_types for convenience
pub use kiln_types::{CategoryId, ErrorCode, EventId};
