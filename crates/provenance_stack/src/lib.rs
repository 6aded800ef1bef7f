//! Call-stack capture for the Provenance diagnostics library.
//!
//! [`CapturedStack`] records raw program counters at the moment a failure is
//! constructed and defers symbolization until someone asks for the frames.
//! Resolved frames are [`StackFrame`] values that render in the familiar
//! `function (file:line)` dump format.
//!
//! # Examples
//!
//! ```
//! use provenance_stack::CapturedStack;
//!
//! fn fail() -> CapturedStack {
//!     CapturedStack::here(0)
//! }
//!
//! let stack = fail();
//! for frame in stack.frames() {
//!     println!("{} at {}:{}", frame.function(), frame.file(), frame.line());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod frame;
mod stack;

pub use frame::{StackFrame, UNKNOWN};
pub use stack::{CapturedStack, DEFAULT_MAX_DEPTH, max_depth, set_max_depth};
