//! Predicates over underlying failures.

use crate::{Failure, Origin};
use std::io;

/// Apply `predicate` to the failure underneath `value`.
///
/// A [`DiagnosticError`](crate::DiagnosticError) is checked through its
/// wrapped failure, an [`ErrorSet`](crate::ErrorSet) is true if any
/// element's failure satisfies the predicate, and a foreign [`Failure`] is
/// checked directly.
///
/// # Examples
///
/// ```
/// use provenance_error::{DiagnosticError, ErrorSet, Failure, apply_predicate};
///
/// let timeout = |failure: &Failure| failure.message().contains("timed out");
///
/// let err = DiagnosticError::new("request timed out");
/// assert!(apply_predicate(timeout, &err));
///
/// let mut set = ErrorSet::new("disk full");
/// set.add(err);
/// assert!(apply_predicate(timeout, &set));
/// assert!(!apply_predicate(timeout, &Failure::msg("disk full")));
/// ```
pub fn apply_predicate<'a, P>(predicate: P, value: impl Into<Origin<'a>>) -> bool
where
    P: Fn(&Failure) -> bool,
{
    satisfies(&predicate, value.into())
}

fn satisfies<P>(predicate: &P, origin: Origin<'_>) -> bool
where
    P: Fn(&Failure) -> bool,
{
    match origin {
        Origin::Foreign(failure) => predicate(failure),
        Origin::Error(error) => satisfies(predicate, error.underlying()),
        Origin::Factory(factory) => satisfies(predicate, Origin::Error(&factory.probe())),
        Origin::Set(set) => set
            .iter()
            .any(|element| satisfies(predicate, element.underlying())),
    }
}

fn has_io_kind(failure: &Failure, kind: io::ErrorKind) -> bool {
    failure
        .downcast_ref::<io::Error>()
        .is_some_and(|error| error.kind() == kind)
}

/// Whether the underlying failure is an `std::io::Error` of kind `NotFound`.
///
/// ```
/// use provenance_error::{DiagnosticError, is_not_exist};
///
/// let missing = std::fs::read("/definitely/not/here").unwrap_err();
/// assert!(is_not_exist(&DiagnosticError::new(missing)));
/// ```
pub fn is_not_exist<'a>(value: impl Into<Origin<'a>>) -> bool {
    apply_predicate(|failure| has_io_kind(failure, io::ErrorKind::NotFound), value)
}

/// Whether the underlying failure is an `std::io::Error` of kind
/// `AlreadyExists`.
pub fn is_exist<'a>(value: impl Into<Origin<'a>>) -> bool {
    apply_predicate(|failure| has_io_kind(failure, io::ErrorKind::AlreadyExists), value)
}

/// Whether the underlying failure is an `std::io::Error` of kind
/// `PermissionDenied`.
pub fn is_permission<'a>(value: impl Into<Origin<'a>>) -> bool {
    apply_predicate(|failure| has_io_kind(failure, io::ErrorKind::PermissionDenied), value)
}
