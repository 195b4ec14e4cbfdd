//! The permanent fault channel.
//!
//! Created once at queue construction with the reserved
//! [`CategoryId::FAULT_CHANNEL`] id, watching exactly [`EventId::FAULT`].
//! Its single built-in handler decodes the serialized [`QueueFault`]
//! payload, logs it through the tracing sink, and unconditionally returns
//! `Ok(())` — so the fault channel can never generate further fault events
//! about itself.

use kiln_event::{Category, HandlerResult, Payload, QueueFault};
use kiln_types::{CategoryId, ErrorCode, EventId};
use tracing::{error, trace, warn};

/// Name of the permanent fault channel category.
pub const FAULT_CHANNEL_NAME: &str = "queue-fault";

/// Logs a fatal internal-invariant violation and aborts.
///
/// These conditions indicate a bug in the host application (or this
/// crate), not a runtime event-handling failure; continuing would leave
/// the dispatcher in an inconsistent state.
pub(crate) fn invariant_violation(msg: &str) -> ! {
    error!("invariant violation: {msg}");
    panic!("invariant violation: {msg}");
}

/// Logs one fault at the level its kind calls for.
///
/// Shared between the built-in handler and the teardown drain, which
/// reports residual entries without going through handler dispatch.
pub(crate) fn log_fault(fault: &QueueFault) {
    trace!(code = fault.code(), "fault channel: {fault:?}");
    match fault {
        QueueFault::HandlerReturn { .. } => error!("{fault}"),
        QueueFault::CategoryNotFound { .. }
        | QueueFault::QueueNotEmpty { .. }
        | QueueFault::QueueNotEmptyNoCategory { .. } => warn!("{fault}"),
    }
}

/// Serializes a fault into the payload of a fault entry.
pub(crate) fn fault_payload(fault: &QueueFault) -> Payload {
    let bytes = serde_json::to_vec(fault).expect("QueueFault serialization is infallible");
    Payload::from(bytes)
}

/// The built-in handler. Never fails.
fn handle(event: EventId, payload: &Payload, _data: &Payload) -> HandlerResult {
    if event != EventId::FAULT {
        invariant_violation("fault channel handler invoked with a non-fault event id");
    }
    let Ok(fault) = serde_json::from_slice::<QueueFault>(payload.as_bytes()) else {
        invariant_violation("fault event payload did not decode");
    };
    log_fault(&fault);
    Ok(())
}

/// Builds the permanent fault channel category.
pub(crate) fn category() -> Category {
    Category::new(CategoryId::FAULT_CHANNEL, FAULT_CHANNEL_NAME)
        .watch(EventId::FAULT)
        .handler(handle)
}
