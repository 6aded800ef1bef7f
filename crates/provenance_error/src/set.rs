//! Ordered aggregates of stack-carrying errors.

use crate::{DiagnosticError, Fault, Origin, Tag, config, pattern};
use std::error::Error;
use std::fmt;
use std::hint::black_box;

/// An ordered, flat collection of [`DiagnosticError`]s.
///
/// A set is only ever created by adding something to it, so it is never
/// empty. Adding another set appends that set's elements: sets never nest.
/// Adding a value that is not yet a [`DiagnosticError`] wraps it first,
/// with the stack captured at the caller of the adding method.
///
/// When the process-wide verbosity is at least
/// [`LOG_THRESHOLD`](crate::LOG_THRESHOLD), every added value is also
/// reported as a `tracing` error event.
///
/// # Examples
///
/// ```
/// use provenance_error::{DiagnosticError, Errf, ErrorSet, errf, is};
///
/// let bogus = Errf::new("{} is bogus");
///
/// let mut set = ErrorSet::new(DiagnosticError::new("boom"));
/// set.add(errf!(bogus, 5));
/// assert_eq!(set.len(), 2);
/// assert!(is(&set, &errf!(bogus, 9)));
/// assert_eq!(set.message(), "boom\n5 is bogus");
/// ```
#[derive(Debug, Clone)]
pub struct ErrorSet {
    errors: Vec<DiagnosticError>,
}

impl ErrorSet {
    /// Category label reported for a wrapped set.
    pub const TYPE_NAME: &'static str = "aggregate";

    fn empty() -> Self {
        Self { errors: Vec::new() }
    }

    /// A set holding `value`'s normalized elements.
    #[inline(never)]
    pub fn new(value: impl Into<Fault>) -> Self {
        let mut set = Self::empty();
        set.push(value.into(), 1);
        black_box(set)
    }

    /// A set holding `value`, or `None` when there is nothing to hold.
    #[inline(never)]
    pub fn from_opt<F: Into<Fault>>(value: Option<F>) -> Option<Self> {
        match value {
            Some(value) => {
                let mut set = Self::empty();
                set.push(value.into(), 1);
                Some(black_box(set))
            }
            None => None,
        }
    }

    /// Add `value` to the set held in `slot`, creating the set on first use.
    ///
    /// ```
    /// use provenance_error::ErrorSet;
    ///
    /// let mut errors: Option<ErrorSet> = None;
    /// for step in ["parse", "load"] {
    ///     ErrorSet::push_into(&mut errors, format!("{} failed", step));
    /// }
    /// assert_eq!(errors.map(|set| set.len()), Some(2));
    /// ```
    #[inline(never)]
    pub fn push_into(slot: &mut Option<Self>, value: impl Into<Fault>) -> &mut Self {
        let set = slot.get_or_insert_with(Self::empty);
        set.push(value.into(), 1);
        set
    }

    /// Append `value`'s normalized elements.
    ///
    /// A [`DiagnosticError`] is appended as is, an [`ErrorSet`] contributes
    /// its elements in order, anything else is wrapped with a fresh tag.
    #[inline(never)]
    pub fn add(&mut self, value: impl Into<Fault>) -> &mut Self {
        self.push(value.into(), 1);
        self
    }

    /// [`add`](Self::add) for an optional value. `None` leaves the set
    /// untouched.
    #[inline(never)]
    pub fn add_opt<F: Into<Fault>>(&mut self, value: Option<F>) -> &mut Self {
        if let Some(value) = value {
            self.push(value.into(), 1);
        }
        self
    }

    /// Append a message built from a runtime pattern.
    #[inline(never)]
    pub fn addf(&mut self, pattern: &str, args: &[&dyn fmt::Display]) -> &mut Self {
        let message = pattern::render(pattern, args);
        let error = DiagnosticError::tagged_message(message, Some(Tag::allocate()), 1);
        self.push(Fault::Error(error), 0);
        self
    }

    /// Normalize and append, wrapping with a stack `skip` frames above the
    /// caller.
    #[inline(never)]
    fn push(&mut self, fault: Fault, skip: usize) {
        let logged = config::logging_enabled().then(|| fault.to_string());

        match fault {
            Fault::Error(error) => self.errors.push(error),
            Fault::Set(set) => self.errors.extend(set.errors),
            foreign @ Fault::Foreign(_) => self.errors.push(DiagnosticError::wrap(foreign, skip + 1)),
        }

        if let Some(failure) = logged {
            tracing::error!(%failure, size = self.errors.len(), "Failure added to error set");
        }
    }

    /// The elements, in insertion order.
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    /// Consume the set, returning its elements.
    pub fn into_errors(self) -> Vec<DiagnosticError> {
        self.errors
    }

    /// Iterate over the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticError> {
        self.errors.iter()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for a set built through the public API.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Element messages joined by newlines.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(DiagnosticError::message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Element full reports joined by newlines.
    pub fn full_report(&self) -> String {
        self.errors
            .iter()
            .map(DiagnosticError::full_report)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether `other` matches any element, see [`is`](crate::is).
    pub fn contains_origin<'a>(&self, other: impl Into<Origin<'a>>) -> bool {
        crate::is(self, other)
    }
}

/// Collect two values into one set.
///
/// If `a` is already a set, `b` is appended to it. Otherwise a new set is
/// built holding `a` first and then `b`. Both operands always end up in the
/// result.
///
/// ```
/// use provenance_error::{Errf, add_to, errf, is};
///
/// let bogus = Errf::new("{} is bogus");
/// let set = add_to(errf!(bogus, 1), errf!(bogus, 2));
/// assert_eq!(set.len(), 2);
/// assert!(set.iter().all(|err| is(err, &bogus)));
///
/// let set = add_to("plain", "text");
/// assert_eq!(set.message(), "plain\ntext");
/// ```
#[inline(never)]
pub fn add_to(a: impl Into<Fault>, b: impl Into<Fault>) -> ErrorSet {
    match a.into() {
        Fault::Set(mut set) => {
            set.push(b.into(), 1);
            black_box(set)
        }
        first => {
            let mut set = ErrorSet::empty();
            set.push(first, 1);
            set.push(b.into(), 1);
            black_box(set)
        }
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl Error for ErrorSet {}

impl<'a> IntoIterator for &'a ErrorSet {
    type Item = &'a DiagnosticError;
    type IntoIter = std::slice::Iter<'a, DiagnosticError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for ErrorSet {
    type Item = DiagnosticError;
    type IntoIter = std::vec::IntoIter<DiagnosticError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
