//! Panic recovery.

use crate::{DiagnosticError, Failure};
use std::hint::black_box;
use std::panic::{self, UnwindSafe};

/// Run `f`, converting a panic into a [`DiagnosticError`].
///
/// The recovered error reports `"panic"` as its type name and carries the
/// panic message when the payload is a string. Its stack starts at the
/// caller of `recover`; the panicking frames have already unwound.
///
/// ```
/// use provenance_error::recover;
///
/// let err = recover(|| -> u8 { panic!("overflowed") }).unwrap_err();
/// assert_eq!(err.type_name(), "panic");
/// assert_eq!(err.message(), "overflowed");
///
/// assert_eq!(recover(|| 7).ok(), Some(7));
/// ```
#[inline(never)]
pub fn recover<T>(f: impl FnOnce() -> T + UnwindSafe) -> Result<T, DiagnosticError> {
    match panic::catch_unwind(f) {
        Ok(value) => Ok(value),
        Err(payload) => {
            let error = black_box(DiagnosticError::wrap(Failure::panic(payload), 1));
            tracing::debug!(message = %error, "Recovered from panic");
            Err(error)
        }
    }
}
