//! Core types for the Kiln event core.
//!
//! This crate provides the foundational identifier types and error
//! conventions shared by the Kiln crates.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  kiln-types : EventId, CategoryId, ErrorCode  ◄── HERE      │
//! │  kiln-event : Payload, Category, EventHandler, QueueFault   │
//! │  kiln-queue : EventQueue (registry, FIFO, tick, faults)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Identifiers are plain integer domains, not unique per occurrence:
//!
//! - [`EventId`] (`u64`) names a *kind* of occurrence ("window closed",
//!   "key pressed"); many queue entries may share one id.
//! - [`CategoryId`] (`i64`) names a registered category of interest.
//!
//! The maximum representable value of each domain is permanently reserved
//! for the queue's own fault reporting ([`EventId::FAULT`],
//! [`CategoryId::FAULT_CHANNEL`]); application code must not allocate them.
//!
//! # Example
//!
//! ```
//! use kiln_types::{CategoryId, EventId};
//!
//! const WINDOW_CLOSED: EventId = EventId::new(0x10);
//! let input = CategoryId::new(1);
//!
//! assert!(!WINDOW_CLOSED.is_reserved());
//! assert!(EventId::FAULT.is_reserved());
//! assert!(input < CategoryId::FAULT_CHANNEL);
//! ```

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{CategoryId, EventId};
