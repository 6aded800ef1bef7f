//! Attaching stacks to results on their way up.

use crate::{DiagnosticError, Fault};
use std::error::Error;
use std::hint::black_box;

/// Extension trait converting any `Result` into one carrying a
/// [`DiagnosticError`], with the stack captured at the call site.
///
/// Errors that are already a `DiagnosticError` pass through unchanged.
///
/// ```
/// use provenance_error::{DiagnosticError, ResultExt, is_not_exist};
///
/// fn read_settings() -> Result<Vec<u8>, DiagnosticError> {
///     std::fs::read("/no/such/settings.toml").diagnose_with("reading settings")
/// }
///
/// let err = read_settings().unwrap_err();
/// assert!(err.message().starts_with("reading settings: "));
/// assert!(is_not_exist(&err));
/// assert!(!err.stack().is_empty());
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with the stack of the caller.
    fn diagnose(self) -> Result<T, DiagnosticError>;

    /// Wrap the error with the stack of the caller and prefix its message.
    fn diagnose_with(self, prefix: impl Into<String>) -> Result<T, DiagnosticError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    #[inline(never)]
    fn diagnose(self) -> Result<T, DiagnosticError> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(black_box(DiagnosticError::wrap(Fault::from_error(error), 1))),
        }
    }

    #[inline(never)]
    fn diagnose_with(self, prefix: impl Into<String>) -> Result<T, DiagnosticError> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(black_box(DiagnosticError::wrap_with_prefix(
                Fault::from_error(error),
                prefix,
                1,
            ))),
        }
    }
}
