//! Fault taxonomy for the event queue.
//!
//! Faults are the queue's *recoverable* failure reports. They are never
//! returned to callers of `push`/`tick`; the queue serializes them and
//! re-injects them as entries on [`EventId::FAULT`](kiln_types::EventId),
//! where the permanent fault channel category logs them — within the same
//! drain loop, so a failure is visible in the tick that caused it.
//!
//! Conditions that "must never happen" (missing fault channel, undecodable
//! fault payload) are **not** part of this taxonomy; they are fatal
//! invariant violations and abort.
//!
//! # Error Code Convention
//!
//! | Fault | Code | Logged as |
//! |-------|------|-----------|
//! | [`QueueFault::CategoryNotFound`] | `QUEUE_CATEGORY_NOT_FOUND` | warning |
//! | [`QueueFault::HandlerReturn`] | `QUEUE_HANDLER_RETURN` | error |
//! | [`QueueFault::QueueNotEmpty`] | `QUEUE_NOT_EMPTY` | warning |
//! | [`QueueFault::QueueNotEmptyNoCategory`] | `QUEUE_NOT_EMPTY_NO_CATEGORY` | warning |
//!
//! All four are recoverable: the application keeps running and observes
//! them only through the logging sink.

use crate::FaultCode;
use kiln_types::{CategoryId, ErrorCode, EventId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recoverable failure detected by the queue about itself.
///
/// Serialized (JSON) into the payload of a fault entry, decoded and logged
/// by the fault channel's built-in handler.
///
/// # Example
///
/// ```
/// use kiln_event::QueueFault;
/// use kiln_types::{ErrorCode, EventId};
///
/// let fault = QueueFault::CategoryNotFound {
///     event: EventId::new(0x30),
/// };
///
/// assert_eq!(fault.code(), "QUEUE_CATEGORY_NOT_FOUND");
/// assert!(fault.is_recoverable());
/// assert!(fault.to_string().contains("not watched"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum QueueFault {
    /// An event was pushed whose id matches no registered category.
    ///
    /// The entry's payload is discarded; the entry is not retried.
    #[error("event {event} is not watched by any category")]
    CategoryNotFound {
        /// Id of the unmatched event.
        event: EventId,
    },

    /// A handler returned a failure code.
    ///
    /// The event still counts as handled; remaining handlers and
    /// categories run normally.
    #[error("category {name:?} (id {category}): handler for event {event} returned code {code}")]
    HandlerReturn {
        /// Id of the category owning the failing handler.
        category: CategoryId,
        /// Name of that category.
        name: String,
        /// Id of the dispatched event.
        event: EventId,
        /// The handler's failure code, opaque to the core.
        code: FaultCode,
    },

    /// The queue was dropped while an entry watched by a live category was
    /// still pending. No handler is invoked for the residual entry.
    #[error("queue dropped while category {name:?} (id {category}) still had pending event {event}")]
    QueueNotEmpty {
        /// Id of the watching category.
        category: CategoryId,
        /// Name of that category.
        name: String,
        /// Id of the residual event.
        event: EventId,
    },

    /// The queue was dropped while an unwatched entry was still pending.
    #[error("queue dropped while unwatched event {event} was still pending")]
    QueueNotEmptyNoCategory {
        /// Id of the residual event.
        event: EventId,
    },
}

impl ErrorCode for QueueFault {
    fn code(&self) -> &'static str {
        match self {
            Self::CategoryNotFound { .. } => "QUEUE_CATEGORY_NOT_FOUND",
            Self::HandlerReturn { .. } => "QUEUE_HANDLER_RETURN",
            Self::QueueNotEmpty { .. } => "QUEUE_NOT_EMPTY",
            Self::QueueNotEmptyNoCategory { .. } => "QUEUE_NOT_EMPTY_NO_CATEGORY",
        }
    }

    /// Every fault kind is recoverable; fatal conditions abort instead of
    /// becoming faults.
    fn is_recoverable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_types::assert_error_codes;

    fn all_variants() -> Vec<QueueFault> {
        vec![
            QueueFault::CategoryNotFound {
                event: EventId::new(1),
            },
            QueueFault::HandlerReturn {
                category: CategoryId::new(2),
                name: "input".into(),
                event: EventId::new(1),
                code: FaultCode(7),
            },
            QueueFault::QueueNotEmpty {
                category: CategoryId::new(2),
                name: "input".into(),
                event: EventId::new(1),
            },
            QueueFault::QueueNotEmptyNoCategory {
                event: EventId::new(1),
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "QUEUE_");
    }

    #[test]
    fn all_faults_recoverable() {
        for fault in all_variants() {
            assert!(fault.is_recoverable(), "{fault:?}");
        }
    }

    #[test]
    fn handler_return_display() {
        let fault = QueueFault::HandlerReturn {
            category: CategoryId::new(2),
            name: "input".into(),
            event: EventId::new(0x20),
            code: FaultCode(7),
        };

        let text = fault.to_string();
        assert!(text.contains("\"input\""));
        assert!(text.contains("(id 2)"));
        assert!(text.contains("0x20"));
        assert!(text.contains("code 7"));
    }

    #[test]
    fn fault_json_roundtrip() {
        for fault in all_variants() {
            let json = serde_json::to_vec(&fault).unwrap();
            let back: QueueFault = serde_json::from_slice(&json).unwrap();
            assert_eq!(fault, back);
        }
    }
}
