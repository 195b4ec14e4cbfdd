//! In-process event queue for Kiln.
//!
//! A single FIFO decouples event producers (input subsystems, platform
//! callbacks) from event consumers (application logic), grouped by named
//! categories that declare interest in sets of event ids and own ordered
//! handler lists.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  kiln-types : EventId, CategoryId, ErrorCode                │
//! │  kiln-event : Payload, Category, EventHandler, QueueFault   │
//! │  kiln-queue : EventQueue  ◄── HERE                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Flow
//!
//! ```text
//! producers ── push ──► ┌───────────────┐
//!   (any thread)        │  EventQueue   │
//!                       │  FIFO + lock  │ ◄── registry (categories)
//! main loop ── tick ──► └───────────────┘
//!                               │ per entry: every watching category,
//!                               ▼ handlers in registration order
//!                       handler.invoke(event, &payload, &data)
//!                               │ Err(code) / no watcher
//!                               ▼
//!                       QueueFault re-queued on EventId::FAULT,
//!                       logged by the fault channel in the same tick
//! ```
//!
//! # Concurrency
//!
//! The queue spawns no threads; it is driven entirely by its callers.
//! `push` is safe from any number of producer threads; `tick` expects a
//! single consumer thread. One lock protects registry and FIFO, acquired
//! per push and per drained entry and released while handlers run — so
//! handlers may push follow-up events onto the queue that invoked them.
//!
//! There is no backpressure: an unbounded producer grows the queue without
//! limit, bounded only by how fast ticks drain it.
//!
//! # Errors
//!
//! Recoverable failures ([`QueueFault`]) are re-injected into the queue
//! and observed only through the logging sink — never through `push`/`tick`
//! return values. Internal invariant violations (a missing fault channel,
//! an undecodable fault payload) log at error level and panic.

mod fault_channel;
mod queue;
mod registry;

pub use fault_channel::FAULT_CHANNEL_NAME;
pub use queue::EventQueue;

// Re-export the vocabulary crates for convenience
pub use kiln_event::{Category, EventHandler, FaultCode, HandlerResult, Payload, QueueFault};
pub use kiln_types::{CategoryId, ErrorCode, EventId};
