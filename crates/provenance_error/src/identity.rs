//! Origin-based identity comparison.

use crate::Origin;

/// Whether `a` and `b` come from the same underlying failure.
///
/// The comparison unwraps as far as needed, in this order:
///
/// 1. The very same value (including clones sharing a captured stack) matches.
/// 2. An uninvoked factory stands for one of its invocations.
/// 3. A [`DiagnosticError`](crate::DiagnosticError) matches whatever its
///    wrapped value matches, on either side.
/// 4. Two `DiagnosticError`s with the same non-empty tag match.
/// 5. An [`ErrorSet`](crate::ErrorSet) matches if any element matches, on
///    either side.
///
/// Structural unwrapping takes priority over tags, so an error always
/// matches what it directly wraps.
///
/// # Examples
///
/// ```
/// use provenance_error::{DiagnosticError, Errf, ErrorSet, Failure, errf, is};
///
/// let bogus = Errf::new("{} is bogus");
/// assert!(is(&errf!(bogus, 1), &errf!(bogus, 2)));
/// assert!(is(&errf!(bogus, 1), &bogus));
///
/// let failure = Failure::msg("root cause");
/// let wrapped = DiagnosticError::new(failure.clone());
/// assert!(is(&wrapped, &failure));
///
/// let set = ErrorSet::new(wrapped);
/// assert!(is(&set, &failure));
/// assert!(!is(&set, &bogus));
/// ```
pub fn is<'a, 'b>(a: impl Into<Origin<'a>>, b: impl Into<Origin<'b>>) -> bool {
    identical(a.into(), b.into())
}

fn identical(a: Origin<'_>, b: Origin<'_>) -> bool {
    if a.same_value(b) {
        return true;
    }

    match (a, b) {
        (Origin::Factory(factory), _) => return identical(Origin::Error(&factory.probe()), b),
        (_, Origin::Factory(factory)) => return identical(a, Origin::Error(&factory.probe())),
        _ => {}
    }

    if let Origin::Error(error) = a
        && identical(error.underlying(), b)
    {
        return true;
    }
    if let Origin::Error(error) = b
        && identical(a, error.underlying())
    {
        return true;
    }

    match (a, b) {
        (Origin::Error(x), Origin::Error(y)) => matches!((x.tag(), y.tag()), (Some(p), Some(q)) if p == q),
        (Origin::Set(set), other) => set.iter().any(|element| identical(Origin::Error(element), other)),
        (other, Origin::Set(set)) => set.iter().any(|element| identical(other, Origin::Error(element))),
        (Origin::Foreign(_), Origin::Foreign(_) | Origin::Error(_))
        | (Origin::Error(_), Origin::Foreign(_)) => false,
        (Origin::Factory(_), _) | (_, Origin::Factory(_)) => false,
    }
}
