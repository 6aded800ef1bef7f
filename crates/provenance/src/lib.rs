//! Provenance - errors that remember where they came from
//!
//! Provenance wraps failure values together with the call stack of the place
//! they were created, and keeps track of *where a failure originated* so that
//! two errors can be compared by origin even after wrapping, prefixing or
//! aggregation.
//!
//! # Features
//!
//! - **Stack capture**: Every [`DiagnosticError`] records the stack of its
//!   construction site, symbolized lazily on first use
//! - **Error factories**: [`Errf`] patterns produce errors whose messages vary
//!   but which all compare equal under [`is`]
//! - **Aggregation**: [`ErrorSet`] collects failures in order, flattening
//!   nested sets
//! - **Predicates**: [`is_not_exist`], [`is_exist`] and [`is_permission`] see
//!   through wrapping and aggregation
//!
//! # Quick Start
//!
//! ```
//! use provenance::{DiagnosticError, Errf, ErrorSet, ResultExt, errf, is};
//! use std::sync::LazyLock;
//!
//! static INVALID: LazyLock<Errf> = LazyLock::new(|| Errf::new("invalid record {}"));
//!
//! fn check(id: u32) -> Result<(), DiagnosticError> {
//!     if id % 2 == 0 { Ok(()) } else { Err(errf!(INVALID, id)) }
//! }
//!
//! fn parse(text: &str) -> Result<u32, DiagnosticError> {
//!     text.parse::<u32>().diagnose_with("parsing record id")
//! }
//!
//! let mut errors: Option<ErrorSet> = None;
//! for text in ["2", "3", "x"] {
//!     match parse(text).and_then(check) {
//!         Ok(()) => {}
//!         Err(err) => {
//!             ErrorSet::push_into(&mut errors, err);
//!         }
//!     }
//! }
//!
//! let errors = errors.unwrap();
//! assert_eq!(errors.len(), 2);
//! assert!(is(&errors, &*INVALID));
//! eprintln!("{}", errors.full_report());
//! ```
//!
//! # Architecture
//!
//! - `provenance_stack` - Stack capture and frame rendering
//! - `provenance_error` - Error values, factories, sets and identity
//!
//! This crate re-exports both and adds logging setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;

pub use provenance_error::*;
pub use provenance_stack::{CapturedStack, DEFAULT_MAX_DEPTH, StackFrame, max_depth, set_max_depth};
pub use telemetry::{init, init_tracing};
