//! Construction shorthands.

/// Build an untagged [`DiagnosticError`](crate::DiagnosticError) from a
/// compile-time format string.
///
/// The stack starts at the macro call site.
///
/// ```
/// use provenance_error::errorf;
///
/// let port = 8080;
/// let err = errorf!("port {} already bound", port);
/// assert_eq!(err.message(), "port 8080 already bound");
/// assert!(err.tag().is_none());
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::DiagnosticError::formatted("{}", &[&::std::format!($($arg)+)])
    };
}

/// Invoke an [`Errf`](crate::Errf) factory with any `Display` arguments.
///
/// ```
/// use provenance_error::{Errf, errf};
///
/// let refused = Errf::new("{} refused connection on {}");
/// let err = errf!(refused, "db", 5432);
/// assert_eq!(err.message(), "db refused connection on 5432");
/// assert_eq!(err.tag(), Some(refused.tag()));
/// ```
#[macro_export]
macro_rules! errf {
    ($factory:expr $(, $arg:expr)* $(,)?) => {
        $factory.invoke(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}
