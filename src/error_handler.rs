//! Handling of fatal precondition violations.
//!
//! Some inconsistencies (like a body stepped by a space without a default area) cannot be
//! recovered from by the body itself. They are reported through [`default_error_handler`], which
//! panics unless the end user installed their own handler in [`GLOBAL_ERROR_HANDLER`].
//!
//! Recoverable errors (like an invalid parameter value) are not routed here; they are returned
//! as [`BodyError`](crate::dynamics::BodyError) instead.

use std::sync::OnceLock;

use log::warn;

/// Possible errors to handle through [`default_error_handler`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// A body integrated its forces while its space had no default area.
    MissingDefaultArea,
}

/// A global error handler. This can be set at startup, as long as it is set before
/// any uses.
///
/// If the handler returns instead of panicking, the operation that raised the error is aborted
/// for the body concerned.
///
/// # Example
///
/// ```
/// use body3d::error_handler::{GLOBAL_ERROR_HANDLER, warn};
/// GLOBAL_ERROR_HANDLER
///     .set(Box::new(warn))
///     .unwrap_or_else(|_| panic!("The error handler can only be set once, globally."));
/// ```
pub static GLOBAL_ERROR_HANDLER: OnceLock<Box<dyn Fn(Error) + Sync + Send>> = OnceLock::new();

/// The default error handler. This defaults to [`panic()`].
#[inline]
pub fn default_error_handler() -> &'static dyn Fn(Error) {
    GLOBAL_ERROR_HANDLER.get_or_init(|| Box::new(panic))
}

/// Error handler that panics with the error.
#[track_caller]
#[inline(always)]
pub fn panic(error: Error) {
    panic!("Encountered an error:\n{:?}", error);
}

/// Error handler that logs the error at the `warn` level.
#[track_caller]
#[inline]
pub fn warn(error: Error) {
    warn!("Encountered an error:\n{:?}", error);
}
