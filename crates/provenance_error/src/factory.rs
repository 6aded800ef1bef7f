//! Formatted error factories.

use crate::{DiagnosticError, Origin, Tag, pattern};
use std::fmt;
use std::hint::black_box;
use std::sync::Arc;

/// A reusable error template bound to one identity tag.
///
/// Every invocation produces a new [`DiagnosticError`] whose message is the
/// pattern with the arguments substituted, and whose tag is the factory's.
/// All errors from one factory therefore match each other under
/// [`is`](crate::is), whatever their arguments, and never match errors from
/// a different factory, even one built from the same pattern.
///
/// Patterns use `{}` placeholders, see [`errf!`](crate::errf) for the
/// invocation shorthand.
///
/// # Examples
///
/// ```
/// use provenance_error::{Errf, errf, is};
/// use std::sync::LazyLock;
///
/// static CRASHED: LazyLock<Errf> = LazyLock::new(|| Errf::new("oh {}"));
///
/// fn crash(who: &str) -> provenance_error::DiagnosticError {
///     errf!(CRASHED, who)
/// }
///
/// let err = crash("dear");
/// assert_eq!(err.message(), "oh dear");
/// assert!(is(&err, &*CRASHED));
/// assert!(is(&err, &crash("my")));
///
/// let lookalike = Errf::new("oh {}");
/// assert!(!is(&err, &errf!(lookalike, "dear")));
/// ```
#[derive(Debug, Clone)]
pub struct Errf {
    pattern: Arc<str>,
    tag: Tag,
}

impl Errf {
    /// Create a factory for `pattern`, allocating its tag.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern: Arc<str> = Arc::from(pattern.into());
        let tag = Tag::allocate();
        tracing::debug!(%tag, pattern = %pattern, "Created error factory");
        Self { pattern, tag }
    }

    /// Produce an error from the pattern and `args`, stack starting at the
    /// caller.
    #[inline(never)]
    pub fn invoke(&self, args: &[&dyn fmt::Display]) -> DiagnosticError {
        let message = pattern::render(&self.pattern, args);
        black_box(DiagnosticError::tagged_message(message, Some(self.tag), 1))
    }

    /// The factory's tag-only stand-in: an invocation without arguments and
    /// without a captured stack.
    pub(crate) fn probe(&self) -> DiagnosticError {
        DiagnosticError::detached(pattern::render(&self.pattern, &[]), self.tag)
    }

    /// The message pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The tag stamped on every produced error.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Identity comparison against anything, see [`is`](crate::is).
    pub fn is<'a>(&self, other: impl Into<Origin<'a>>) -> bool {
        crate::is(self, other)
    }
}

/// The message an invocation without arguments would carry.
impl fmt::Display for Errf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pattern::render(&self.pattern, &[]))
    }
}
