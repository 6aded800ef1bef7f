//! Foreign failure values and their categories.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Kind of an underlying failure, fixed when the failure is constructed.
///
/// The label is what [`DiagnosticError::type_name`](crate::DiagnosticError::type_name)
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Category {
    /// A plain message with no richer error value behind it
    #[display("message")]
    Message,
    /// A foreign error value, labelled with its Rust type name
    #[display("{}", _0)]
    Foreign(&'static str),
    /// A panic recovered with `catch_unwind`
    #[display("panic")]
    Panic,
}

impl Category {
    /// The category label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Message => "message",
            Category::Foreign(type_name) => *type_name,
            Category::Panic => "panic",
        }
    }
}

enum Repr {
    Message(String),
    Foreign {
        error: Box<dyn Error + Send + Sync>,
        type_name: &'static str,
    },
    Panic(String),
}

/// A failure value that did not originate from this library.
///
/// `Failure` is a cheap handle: clones share the same allocation and are
/// the same value for identity comparison, while two separately constructed
/// failures never are, even if their messages match.
///
/// # Examples
///
/// ```
/// use provenance_error::{Category, Failure};
/// use std::io;
///
/// let failure = Failure::foreign(io::Error::from(io::ErrorKind::NotFound));
/// assert_eq!(failure.category(), Category::Foreign("std::io::error::Error"));
/// assert!(failure.downcast_ref::<io::Error>().is_some());
///
/// let copy = failure.clone();
/// assert!(copy.same(&failure));
/// assert!(!Failure::msg("boom").same(&Failure::msg("boom")));
/// ```
#[derive(Clone)]
pub struct Failure {
    repr: Arc<Repr>,
}

impl Failure {
    fn from_repr(repr: Repr) -> Self {
        Self {
            repr: Arc::new(repr),
        }
    }

    /// A message-only failure.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::from_repr(Repr::Message(message.to_string()))
    }

    /// Wrap a foreign error value, remembering its type name.
    pub fn foreign<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::named(Box::new(error), std::any::type_name::<E>())
    }

    /// Type name reported for boxed values whose concrete type is unknown.
    pub const BOXED_TYPE_NAME: &'static str = "dyn std::error::Error";

    /// Wrap an already boxed error value.
    ///
    /// The concrete type is not recoverable, so the value is labelled
    /// [`BOXED_TYPE_NAME`](Self::BOXED_TYPE_NAME).
    pub fn boxed(error: Box<dyn Error + Send + Sync>) -> Self {
        Self::named(error, Self::BOXED_TYPE_NAME)
    }

    pub(crate) fn named(error: Box<dyn Error + Send + Sync>, type_name: &'static str) -> Self {
        Self::from_repr(Repr::Foreign { error, type_name })
    }

    /// A recovered panic, built from a `catch_unwind` payload.
    ///
    /// String payloads become the message; anything else is reported as an
    /// opaque payload.
    pub fn panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self::from_repr(Repr::Panic(message))
    }

    /// The category recorded at construction.
    pub fn category(&self) -> Category {
        match &*self.repr {
            Repr::Message(_) => Category::Message,
            Repr::Foreign { type_name, .. } => Category::Foreign(*type_name),
            Repr::Panic(_) => Category::Panic,
        }
    }

    /// The failure's message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The wrapped foreign value, if it is an `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        match &*self.repr {
            Repr::Foreign { error, .. } => error.downcast_ref::<E>(),
            Repr::Message(_) | Repr::Panic(_) => None,
        }
    }

    /// Whether both handles refer to the same failure value.
    pub fn same(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.repr, &other.repr)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.repr {
            Repr::Message(message) | Repr::Panic(message) => f.write_str(message),
            Repr::Foreign { error, .. } => write!(f, "{}", error),
        }
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("category", &self.category())
            .field("message", &self.to_string())
            .finish()
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &*self.repr {
            Repr::Foreign { error, .. } => error.source(),
            Repr::Message(_) | Repr::Panic(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("outer")]
    struct Outer {
        source: io::Error,
    }

    #[test]
    fn message_failure() {
        let failure = Failure::msg("disk full");
        assert_eq!(failure.category(), Category::Message);
        assert_eq!(failure.category().label(), "message");
        assert_eq!(failure.message(), "disk full");
        assert!(failure.downcast_ref::<io::Error>().is_none());
    }

    #[test]
    fn foreign_failure_keeps_type_name() {
        let failure = Failure::foreign(io::Error::other("nope"));
        assert_eq!(failure.category().label(), "std::io::error::Error");
        assert_eq!(failure.to_string(), "nope");
        assert_eq!(
            failure.downcast_ref::<io::Error>().map(io::Error::kind),
            Some(io::ErrorKind::Other)
        );
    }

    #[test]
    fn boxed_failure_downcasts() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(io::Error::from(io::ErrorKind::NotFound));
        let failure = Failure::boxed(boxed);
        assert!(failure.downcast_ref::<io::Error>().is_some());
        assert_eq!(failure.category().label(), Failure::BOXED_TYPE_NAME);
    }

    #[test]
    fn panic_payloads() {
        let from_str = Failure::panic(Box::new("boom"));
        assert_eq!(from_str.category(), Category::Panic);
        assert_eq!(from_str.to_string(), "boom");

        let from_string = Failure::panic(Box::new(String::from("kaboom")));
        assert_eq!(from_string.to_string(), "kaboom");

        let opaque = Failure::panic(Box::new(42_u32));
        assert_eq!(opaque.to_string(), "Box<dyn Any>");
        assert_eq!(opaque.category().label(), "panic");
    }

    #[test]
    fn identity_is_per_allocation() {
        let a = Failure::msg("same");
        let b = Failure::msg("same");
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }

    #[test]
    fn source_is_forwarded_from_foreign_value() {
        let failure = Failure::foreign(Outer {
            source: io::Error::other("inner"),
        });
        let source = failure.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("inner"));
    }
}
