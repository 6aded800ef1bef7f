//! Errors that carry the call stack of their construction site.

use crate::{ErrorSet, Failure, Fault, Origin, Tag, pattern};
use provenance_stack::{CapturedStack, StackFrame};
use std::error::Error;
use std::fmt;
use std::hint::black_box;
use std::sync::Arc;

/// What a [`DiagnosticError`] wraps. Never another `DiagnosticError`.
#[derive(Debug, Clone)]
enum Cause {
    Foreign(Failure),
    Set(ErrorSet),
}

impl Fault {
    /// Split off values that are already wrapped.
    fn into_cause(self) -> Result<Cause, DiagnosticError> {
        match self {
            Fault::Foreign(failure) => Ok(Cause::Foreign(failure)),
            Fault::Error(error) => Err(error),
            Fault::Set(set) => Ok(Cause::Set(set)),
        }
    }
}

/// A failure value with the call stack captured where it was created.
///
/// The stack is captured once, at construction, and symbolized lazily the
/// first time it is looked at. Clones share the stack and are the same
/// value as far as [`is`](crate::is) is concerned.
///
/// The top frame is the function that called the constructor. In optimized
/// builds a caller that returns the constructor's result directly may be
/// compiled into a jump, in which case its own caller is on top instead.
///
/// Each error carries an optional identity [`Tag`]:
/// - [`new`](Self::new) and [`wrap`](Self::wrap) allocate a fresh tag, so
///   the error only matches itself and what it wraps.
/// - [`formatted`](Self::formatted) leaves the tag empty.
/// - An [`Errf`](crate::Errf) factory stamps its own tag on every error it
///   produces, which makes all of them match each other.
///
/// # Examples
///
/// ```
/// use provenance_error::{DiagnosticError, is};
///
/// fn open_config() -> Result<(), DiagnosticError> {
///     Err(DiagnosticError::new("config missing"))
/// }
///
/// let err = open_config().unwrap_err();
/// assert_eq!(err.message(), "config missing");
/// assert_eq!(err.type_name(), "message");
/// assert!(!err.stack().is_empty());
///
/// let rewrapped = DiagnosticError::wrap(err.clone(), 0);
/// assert!(rewrapped.same(&err));
/// assert!(is(&rewrapped, &err));
/// ```
#[derive(Clone)]
pub struct DiagnosticError {
    cause: Cause,
    stack: Arc<CapturedStack>,
    prefix: Option<String>,
    tag: Option<Tag>,
}

impl DiagnosticError {
    /// Record `cause` with a stack beginning `skip` frames above the caller.
    ///
    /// Every constructor that forwards a `skip` returns through `black_box`
    /// so its frame survives optimization and the count stays exact.
    #[inline(never)]
    fn record(cause: Cause, tag: Option<Tag>, skip: usize) -> Self {
        Self {
            cause,
            stack: Arc::new(CapturedStack::here(skip + 1)),
            prefix: None,
            tag,
        }
    }

    /// Wrap `value`, capturing the stack at the caller.
    ///
    /// Values that are already a `DiagnosticError` are returned unchanged.
    #[inline(never)]
    pub fn new(value: impl Into<Fault>) -> Self {
        match value.into().into_cause() {
            Ok(cause) => black_box(Self::record(cause, Some(Tag::allocate()), 1)),
            Err(existing) => existing,
        }
    }

    /// Wrap `value`, capturing the stack `skip` frames above the caller.
    ///
    /// `skip == 0` starts at the caller of `wrap`, `1` at its caller, and so
    /// on. Wrapping is idempotent: a value that is already a
    /// `DiagnosticError` is returned as is, keeping its original stack and
    /// tag.
    #[inline(never)]
    pub fn wrap(value: impl Into<Fault>, skip: usize) -> Self {
        match value.into().into_cause() {
            Ok(cause) => black_box(Self::record(cause, Some(Tag::allocate()), skip + 1)),
            Err(existing) => existing,
        }
    }

    /// [`wrap`](Self::wrap) and then [`with_prefix`](Self::with_prefix).
    #[inline(never)]
    pub fn wrap_with_prefix(value: impl Into<Fault>, prefix: impl Into<String>, skip: usize) -> Self {
        black_box(Self::wrap(value, skip + 1)).with_prefix(prefix)
    }

    /// A message-only error built from a runtime pattern, with no tag.
    ///
    /// See [`errorf!`](crate::errorf) for compile-time format strings.
    ///
    /// ```
    /// use provenance_error::DiagnosticError;
    ///
    /// let err = DiagnosticError::formatted("{} of {} failed", &[&3, &5]);
    /// assert_eq!(err.message(), "3 of 5 failed");
    /// assert!(err.tag().is_none());
    /// ```
    #[inline(never)]
    pub fn formatted(pattern: &str, args: &[&dyn fmt::Display]) -> Self {
        let failure = Failure::msg(pattern::render(pattern, args));
        black_box(Self::record(Cause::Foreign(failure), None, 1))
    }

    /// Message-only error with the given tag, stack starting `skip` frames
    /// above the caller.
    #[inline(never)]
    pub(crate) fn tagged_message(message: String, tag: Option<Tag>, skip: usize) -> Self {
        black_box(Self::record(Cause::Foreign(Failure::msg(message)), tag, skip + 1))
    }

    /// Message-only error with an empty stack, used for identity probes.
    pub(crate) fn detached(message: String, tag: Tag) -> Self {
        Self {
            cause: Cause::Foreign(Failure::msg(message)),
            stack: Arc::new(CapturedStack::empty()),
            prefix: None,
            tag: Some(tag),
        }
    }

    /// Add a prefix to the message.
    ///
    /// Repeated prefixes stack outward: the newest prefix comes first and
    /// prefixes are joined with `": "`.
    ///
    /// ```
    /// use provenance_error::DiagnosticError;
    ///
    /// let err = DiagnosticError::new("timed out")
    ///     .with_prefix("fetch")
    ///     .with_prefix("sync");
    /// assert_eq!(err.message(), "sync: fetch: timed out");
    /// ```
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = Some(match self.prefix.take() {
            Some(existing) => format!("{}: {}", prefix, existing),
            None => prefix,
        });
        self
    }

    /// The message of the underlying failure, preceded by the prefix.
    pub fn message(&self) -> String {
        let message = match &self.cause {
            Cause::Foreign(failure) => failure.message(),
            Cause::Set(set) => set.message(),
        };
        match &self.prefix {
            Some(prefix) => format!("{}: {}", prefix, message),
            None => message,
        }
    }

    /// Category label of the underlying failure.
    ///
    /// `"panic"` for recovered panics, `"message"` for message-only
    /// failures, `"aggregate"` for a wrapped [`ErrorSet`], otherwise the
    /// Rust type name of the foreign value.
    pub fn type_name(&self) -> &'static str {
        match &self.cause {
            Cause::Foreign(failure) => failure.category().label(),
            Cause::Set(_) => ErrorSet::TYPE_NAME,
        }
    }

    /// Type name, message, and the rendered stack.
    pub fn full_report(&self) -> String {
        format!("{} {}\n{}", self.type_name(), self.message(), self.stack.render())
    }

    /// The captured stack.
    pub fn stack(&self) -> &CapturedStack {
        &self.stack
    }

    /// Resolved stack frames, innermost first.
    pub fn frames(&self) -> &[StackFrame] {
        self.stack.frames()
    }

    /// The identity tag, if any.
    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    /// The accumulated prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The wrapped value.
    pub fn underlying(&self) -> Origin<'_> {
        match &self.cause {
            Cause::Foreign(failure) => Origin::Foreign(failure),
            Cause::Set(set) => Origin::Set(set),
        }
    }

    /// The wrapped foreign failure, unless this wraps an [`ErrorSet`].
    pub fn failure(&self) -> Option<&Failure> {
        match &self.cause {
            Cause::Foreign(failure) => Some(failure),
            Cause::Set(_) => None,
        }
    }

    /// Whether `self` and `other` come from the same construction.
    pub fn same(&self, other: &DiagnosticError) -> bool {
        Arc::ptr_eq(&self.stack, &other.stack)
    }

    /// Identity comparison against anything, see [`is`](crate::is).
    pub fn is<'a>(&self, other: impl Into<Origin<'a>>) -> bool {
        crate::is(self, other)
    }
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl fmt::Debug for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticError")
            .field("type_name", &self.type_name())
            .field("message", &self.message())
            .field("tag", &self.tag)
            .field("depth", &self.stack.len())
            .finish()
    }
}

impl Error for DiagnosticError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Cause::Foreign(failure) => Some(failure),
            Cause::Set(set) => Some(set),
        }
    }
}
