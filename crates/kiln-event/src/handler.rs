//! Handler contract for dispatched events.
//!
//! Handlers replace the original design's raw function pointers with a
//! trait object: closures capture their own state instead of receiving an
//! untyped pointer, and failure is an explicit `Result` instead of a
//! sentinel return value.
//!
//! # Contract
//!
//! A handler is invoked once per (matching category × queued event) during
//! a tick, in registration order, with the entry payload and the owning
//! category's user data. `Ok(())` means success; `Err(code)` is an
//! application-defined failure code the queue surfaces through the fault
//! channel. Handlers may call `EventQueue::push` — the dispatch lock is not
//! held while they run.

use crate::Payload;
use kiln_types::EventId;
use serde::{Deserialize, Serialize};

/// Application-defined handler failure code.
///
/// Opaque to the core beyond being logged with the fault; by convention
/// non-zero (success is `Ok(())`, not a code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaultCode(pub i32);

impl std::fmt::Display for FaultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a single handler invocation.
pub type HandlerResult = Result<(), FaultCode>;

/// A callable registered on a category.
///
/// Implemented automatically for matching `Fn` closures and plain
/// functions, so both register directly:
///
/// ```
/// use kiln_event::{EventHandler, HandlerResult, Payload};
/// use kiln_types::EventId;
/// use std::sync::Arc;
///
/// fn on_quit(_: EventId, _: &Payload, _: &Payload) -> HandlerResult {
///     Ok(())
/// }
///
/// let a: Arc<dyn EventHandler> = Arc::new(on_quit);
/// let b: Arc<dyn EventHandler> =
///     Arc::new(|_: EventId, _: &Payload, _: &Payload| Ok(()));
///
/// assert!(a.invoke(EventId::new(1), &Payload::Empty, &Payload::Empty).is_ok());
/// assert!(b.invoke(EventId::new(1), &Payload::Empty, &Payload::Empty).is_ok());
/// ```
pub trait EventHandler: Send + Sync {
    /// Handles one dispatched event.
    ///
    /// # Arguments
    ///
    /// * `event` - The queued event id
    /// * `payload` - The entry's payload
    /// * `data` - The matching category's user data
    fn invoke(&self, event: EventId, payload: &Payload, data: &Payload) -> HandlerResult;
}

impl<F> EventHandler for F
where
    F: Fn(EventId, &Payload, &Payload) -> HandlerResult + Send + Sync,
{
    fn invoke(&self, event: EventId, payload: &Payload, data: &Payload) -> HandlerResult {
        self(event, payload, data)
    }
}
