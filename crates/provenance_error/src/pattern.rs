//! Runtime message patterns.
//!
//! Factory patterns are ordinary strings known only at runtime, so they
//! cannot go through `format!`. `{}` takes the next argument, `{{` and `}}`
//! are literal braces.

use std::fmt::Display;

/// Rendered in place of a placeholder that has no argument.
pub(crate) const MISSING: &str = "{!missing}";

/// Substitute `args` into `pattern`.
///
/// Surplus arguments are appended as ` {!extra: a, b}` so nothing passed by
/// the caller is silently dropped.
pub(crate) fn render(pattern: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut args = args.iter();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        match (c, next) {
            ('{', Some('{')) => {
                chars.next();
                out.push('{');
            }
            ('{', Some('}')) => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => out.push_str(MISSING),
                }
            }
            ('}', Some('}')) => {
                chars.next();
                out.push('}');
            }
            (c, _) => out.push(c),
        }
    }

    let extra: Vec<String> = args.map(|arg| arg.to_string()).collect();
    if !extra.is_empty() {
        out.push_str(" {!extra: ");
        out.push_str(&extra.join(", "));
        out.push('}');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_in_order() {
        assert_eq!(render("{} of {}", &[&1, &"two"]), "1 of two");
    }

    #[test]
    fn escapes() {
        assert_eq!(render("{{{}}}", &[&7]), "{7}");
        assert_eq!(render("}", &[]), "}");
    }

    #[test]
    fn missing_arguments() {
        assert_eq!(render("{} is bogus", &[]), "{!missing} is bogus");
    }

    #[test]
    fn extra_arguments() {
        assert_eq!(render("plain", &[&1, &2]), "plain {!extra: 1, 2}");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(render("nothing here", &[]), "nothing here");
    }
}
