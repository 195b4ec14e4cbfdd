//! Unified error interface for Kiln.
//!
//! All Kiln error types implement [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: UPPER_SNAKE_CASE, namespace-prefixed,
//!   stable across versions (changing one is a breaking change).
//! - **Recoverability info**: whether the condition is a normal runtime
//!   occurrence the application keeps running through, or a bug that must
//!   not be retried.
//!
//! # Example
//!
//! ```
//! use kiln_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     NotFound,
//!     Busy,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound => "MY_NOT_FOUND",
//!             Self::Busy => "MY_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! assert_eq!(MyError::Busy.code(), "MY_BUSY");
//! ```

/// Unified error code interface for Kiln errors.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// # Format
    ///
    /// - UPPER_SNAKE_CASE
    /// - Prefixed with the owning domain (e.g. `"QUEUE_"`)
    /// - Stable across versions
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    ///
    /// Recoverable conditions are logged and dispatch continues;
    /// non-recoverable conditions indicate a caller bug.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error's code has the expected prefix and format.
///
/// Intended for use in tests:
///
/// ```
/// use kiln_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str {
///         "QUEUE_TIMEOUT"
///     }
///     fn is_recoverable(&self) -> bool {
///         true
///     }
/// }
///
/// assert_error_code(&Timeout, "QUEUE_");
/// ```
///
/// # Panics
///
/// Panics if the code does not start with `expected_prefix` or is not
/// UPPER_SNAKE_CASE.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();
    assert!(
        code.starts_with(expected_prefix),
        "error code {code:?} must start with prefix {expected_prefix:?}"
    );
    assert!(
        is_upper_snake_case(code),
        "error code {code:?} must be UPPER_SNAKE_CASE"
    );
}

/// Asserts [`assert_error_code`] over every variant in a slice.
///
/// # Panics
///
/// Panics if any code fails the prefix or format check.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
