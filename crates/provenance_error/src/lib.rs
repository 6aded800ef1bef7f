//! Stack-carrying, identity-comparable errors for the Provenance library.
//!
//! The value model has three shapes:
//! - [`DiagnosticError`] wraps one underlying failure with the call stack of
//!   the place it was created, an optional message prefix and an optional
//!   identity [`Tag`].
//! - [`Errf`] is a reusable message pattern bound to one tag. Every error it
//!   produces matches every other one under [`is`], whatever the arguments.
//! - [`ErrorSet`] is an ordered, flat collection of `DiagnosticError`s that
//!   matches anything one of its elements matches.
//!
//! # Examples
//!
//! ```
//! use provenance_error::{DiagnosticError, Errf, ErrorSet, errf, is};
//! use std::sync::LazyLock;
//!
//! static TIMED_OUT: LazyLock<Errf> = LazyLock::new(|| Errf::new("{} timed out after {}ms"));
//!
//! fn fetch(host: &str) -> Result<(), DiagnosticError> {
//!     Err(errf!(TIMED_OUT, host, 250))
//! }
//!
//! let mut failures: Option<ErrorSet> = None;
//! for host in ["alpha", "beta"] {
//!     if let Err(err) = fetch(host) {
//!         ErrorSet::push_into(&mut failures, err);
//!     }
//! }
//!
//! let failures = failures.unwrap();
//! assert_eq!(failures.len(), 2);
//! assert!(is(&failures, &*TIMED_OUT));
//! println!("{}", failures.full_report());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

mod config;
mod config_error;
mod convert;
mod error;
mod factory;
mod failure;
mod fault;
mod identity;
mod panic;
mod pattern;
mod predicate;
mod set;
mod tag;

pub use config::{DiagnosticsConfig, DiagnosticsConfigBuilder, LOG_THRESHOLD, set_verbosity, verbosity};
pub use config_error::{ConfigError, ConfigErrorKind, ConfigResult, LAYERED_SOURCES};
pub use convert::ResultExt;
pub use error::DiagnosticError;
pub use factory::Errf;
pub use failure::{Category, Failure};
pub use fault::{Fault, Origin};
pub use identity::is;
pub use panic::recover;
pub use predicate::{apply_predicate, is_exist, is_not_exist, is_permission};
pub use set::{ErrorSet, add_to};
pub use tag::Tag;
