//! Closed sets of failure shapes accepted by the library.
//!
//! [`Fault`] is the owned form, used wherever a value is handed over to be
//! wrapped or collected. [`Origin`] is the borrowed form, used by identity
//! queries and predicates. Every consumer matches them exhaustively.

use crate::{DiagnosticError, Errf, ErrorSet, Failure};
use std::error::Error;
use std::fmt;
use std::io;

/// An owned failure value of any supported shape.
///
/// Plain strings and `std::io::Error` convert into [`Fault::Foreign`]; any
/// other error type goes through [`Failure::foreign`] or
/// [`from_error`](Self::from_error) first. A `Box<dyn Error + Send + Sync>`
/// is unboxed back into the library value it holds, if any.
///
/// # Examples
///
/// ```
/// use provenance_error::{Failure, Fault};
///
/// let from_text: Fault = "boom".into();
/// assert!(matches!(from_text, Fault::Foreign(_)));
///
/// let parse = "x".parse::<i32>().unwrap_err();
/// let from_error: Fault = Failure::foreign(parse).into();
/// assert_eq!(from_error.type_name(), "core::num::error::ParseIntError");
/// ```
#[derive(Debug, Clone, derive_more::From)]
pub enum Fault {
    /// A value that did not originate from this library
    Foreign(Failure),
    /// A value already carrying a captured stack
    Error(DiagnosticError),
    /// An aggregate of stack-carrying values
    Set(ErrorSet),
}

impl Fault {
    /// Classify an arbitrary error value.
    ///
    /// Values that already belong to this library keep their shape, so a
    /// boxed-up [`DiagnosticError`] stays the same error. Anything else
    /// becomes a foreign [`Failure`] labelled with `E`'s type name.
    ///
    /// ```
    /// use provenance_error::{DiagnosticError, Fault};
    ///
    /// let original = DiagnosticError::new("kept");
    /// match Fault::from_error(original.clone()) {
    ///     Fault::Error(err) => assert!(err.same(&original)),
    ///     other => panic!("unexpected {:?}", other),
    /// }
    ///
    /// let parse = "x".parse::<u8>().unwrap_err();
    /// assert_eq!(Fault::from_error(parse).type_name(), "core::num::error::ParseIntError");
    /// ```
    pub fn from_error<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::classify(Box::new(error), std::any::type_name::<E>())
    }

    /// Recover the library value inside `boxed`, or label it `type_name`.
    fn classify(boxed: Box<dyn Error + Send + Sync>, type_name: &'static str) -> Self {
        let boxed = match boxed.downcast::<DiagnosticError>() {
            Ok(error) => return Fault::Error(*error),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<ErrorSet>() {
            Ok(set) => return Fault::Set(*set),
            Err(other) => other,
        };
        match boxed.downcast::<Failure>() {
            Ok(failure) => Fault::Foreign(*failure),
            Err(other) => Fault::Foreign(Failure::named(other, type_name)),
        }
    }

    /// Borrow this value for identity queries.
    pub fn as_origin(&self) -> Origin<'_> {
        match self {
            Fault::Foreign(failure) => Origin::Foreign(failure),
            Fault::Error(error) => Origin::Error(error),
            Fault::Set(set) => Origin::Set(set),
        }
    }

    /// The value's message.
    pub fn message(&self) -> String {
        match self {
            Fault::Foreign(failure) => failure.message(),
            Fault::Error(error) => error.message(),
            Fault::Set(set) => set.message(),
        }
    }

    /// Category label of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Fault::Foreign(failure) => failure.category().label(),
            Fault::Error(error) => error.type_name(),
            Fault::Set(_) => ErrorSet::TYPE_NAME,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Foreign(failure) => write!(f, "{}", failure),
            Fault::Error(error) => write!(f, "{}", error),
            Fault::Set(set) => write!(f, "{}", set),
        }
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Fault::Foreign(Failure::msg(message))
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Fault::Foreign(Failure::msg(message))
    }
}

impl From<io::Error> for Fault {
    fn from(error: io::Error) -> Self {
        Fault::Foreign(Failure::foreign(error))
    }
}

impl From<Box<dyn Error + Send + Sync>> for Fault {
    fn from(error: Box<dyn Error + Send + Sync>) -> Self {
        match error.downcast::<io::Error>() {
            Ok(error) => Fault::Foreign(Failure::foreign(*error)),
            Err(other) => Fault::classify(other, Failure::BOXED_TYPE_NAME),
        }
    }
}

/// A borrowed failure value, including uninvoked factories.
///
/// Anything that can take part in an identity query converts into an
/// `Origin`, so [`is`](crate::is) accepts plain references.
#[derive(Debug, Clone, Copy)]
pub enum Origin<'a> {
    /// A value that did not originate from this library
    Foreign(&'a Failure),
    /// A value carrying a captured stack
    Error(&'a DiagnosticError),
    /// A factory that has not been invoked
    Factory(&'a Errf),
    /// An aggregate of stack-carrying values
    Set(&'a ErrorSet),
}

impl Origin<'_> {
    /// Whether both sides are literally the same value.
    pub(crate) fn same_value(self, other: Origin<'_>) -> bool {
        match (self, other) {
            (Origin::Foreign(a), Origin::Foreign(b)) => a.same(b),
            (Origin::Error(a), Origin::Error(b)) => a.same(b),
            (Origin::Factory(a), Origin::Factory(b)) => a.tag() == b.tag(),
            (Origin::Set(a), Origin::Set(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }
}

impl<'a> From<&'a Failure> for Origin<'a> {
    fn from(failure: &'a Failure) -> Self {
        Origin::Foreign(failure)
    }
}

impl<'a> From<&'a DiagnosticError> for Origin<'a> {
    fn from(error: &'a DiagnosticError) -> Self {
        Origin::Error(error)
    }
}

impl<'a> From<&'a Errf> for Origin<'a> {
    fn from(factory: &'a Errf) -> Self {
        Origin::Factory(factory)
    }
}

impl<'a> From<&'a ErrorSet> for Origin<'a> {
    fn from(set: &'a ErrorSet) -> Self {
        Origin::Set(set)
    }
}

impl<'a> From<&'a Fault> for Origin<'a> {
    fn from(fault: &'a Fault) -> Self {
        fault.as_origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is;

    fn boxed<E: Error + Send + Sync + 'static>(error: E) -> Box<dyn Error + Send + Sync> {
        Box::new(error)
    }

    #[test]
    fn boxed_error_is_not_wrapped_again() {
        let original = DiagnosticError::new("root");
        let rewrapped = DiagnosticError::wrap(boxed(original.clone()), 0);
        assert!(rewrapped.same(&original));
        assert!(is(&rewrapped, &original));
        assert_eq!(rewrapped.tag(), original.tag());
        assert_eq!(rewrapped.type_name(), "message");
    }

    #[test]
    fn boxed_set_is_flattened() {
        let inner = ErrorSet::new("a");
        let first = inner.errors()[0].clone();

        let mut set = ErrorSet::new("outer");
        set.add(boxed(inner));
        assert_eq!(set.len(), 2);
        assert!(set.errors()[1].same(&first));
        assert!(is(&set, &first));
    }

    #[test]
    fn boxed_failure_keeps_identity() {
        let failure = Failure::msg("shared");
        match Fault::from(boxed(failure.clone())) {
            Fault::Foreign(inner) => assert!(inner.same(&failure)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn boxed_io_error_keeps_its_category() {
        let fault = Fault::from(boxed(io::Error::from(io::ErrorKind::NotFound)));
        assert_eq!(fault.type_name(), "std::io::error::Error");
    }

    #[test]
    fn boxed_unknown_type_is_labelled() {
        let parse = "x".parse::<u8>().unwrap_err();
        let fault = Fault::from(boxed(parse));
        assert_eq!(fault.type_name(), Failure::BOXED_TYPE_NAME);
        assert_eq!(fault.message(), "invalid digit found in string");
    }
}
