//! Stacks attached by every construction path start at the caller.
//!
//! These must hold under `cargo test --release` as well. Each helper returns
//! through `black_box` so that it is a real frame in optimized builds; the
//! library's own constructors must not be folded away in between.

use provenance_error::{DiagnosticError, Errf, ErrorSet, ResultExt, add_to, errf, errorf, recover};
use std::hint::black_box;
use std::io;

fn top_function(err: &DiagnosticError) -> String {
    err.frames()
        .first()
        .map(|frame| frame.function().clone())
        .unwrap_or_default()
}

#[inline(never)]
fn via_new() -> DiagnosticError {
    black_box(DiagnosticError::new("new"))
}

#[inline(never)]
fn via_prefix() -> DiagnosticError {
    black_box(DiagnosticError::wrap_with_prefix("prefixed", "outer", 0))
}

#[inline(never)]
fn via_errorf() -> DiagnosticError {
    black_box(errorf!("errorf {}", 1))
}

#[inline(never)]
fn via_factory(factory: &Errf) -> DiagnosticError {
    black_box(errf!(factory, 1))
}

#[inline(never)]
fn via_set() -> ErrorSet {
    let mut set = ErrorSet::new("first");
    set.addf("{}", &[&2]);
    black_box(set)
}

#[inline(never)]
fn via_add_to() -> ErrorSet {
    black_box(add_to(io::Error::other("left"), "right"))
}

#[inline(never)]
fn via_diagnose() -> DiagnosticError {
    let result: Result<(), io::Error> = Err(io::Error::other("io"));
    match result.diagnose() {
        Ok(()) => DiagnosticError::new("unreachable"),
        Err(err) => black_box(err),
    }
}

#[inline(never)]
fn via_recover() -> DiagnosticError {
    match recover(|| -> u8 { panic!("recovered") }) {
        Ok(_) => DiagnosticError::new("unreachable"),
        Err(err) => black_box(err),
    }
}

#[inline(never)]
fn wrap_for_caller() -> DiagnosticError {
    black_box(DiagnosticError::wrap("for caller", 1))
}

#[inline(never)]
fn outer_caller() -> DiagnosticError {
    black_box(wrap_for_caller())
}

#[inline(never)]
fn wrap_in_place(skip: usize) -> DiagnosticError {
    black_box(DiagnosticError::wrap("in place", skip))
}

#[test]
fn test_constructors_start_at_caller() {
    assert!(top_function(&via_new()).contains("via_new"));
    assert!(top_function(&via_prefix()).contains("via_prefix"));
    assert!(top_function(&via_errorf()).contains("via_errorf"));
    assert!(top_function(&via_diagnose()).contains("via_diagnose"));
    assert!(top_function(&via_recover()).contains("via_recover"));

    let factory = Errf::new("{}");
    assert!(top_function(&via_factory(&factory)).contains("via_factory"));
}

#[test]
fn test_set_additions_start_at_caller() {
    let set = via_set();
    for err in &set {
        assert!(top_function(err).contains("via_set"), "got {}", top_function(err));
    }

    let set = via_add_to();
    for err in &set {
        assert!(top_function(err).contains("via_add_to"), "got {}", top_function(err));
    }
}

#[test]
fn test_skip_counts_real_frames() {
    assert!(top_function(&outer_caller()).contains("outer_caller"));

    let here = wrap_in_place(0);
    let up = wrap_in_place(1);
    assert!(top_function(&here).contains("wrap_in_place"));
    assert!(!top_function(&up).contains("wrap_in_place"));
    assert_eq!(up.frames()[0].function(), here.frames()[1].function());
    assert!(up.frames()[0].function().contains("test_skip_counts_real_frames"));
}

#[test]
fn test_full_report_contains_frames() {
    let err = via_new();
    let report = err.full_report();
    assert!(report.starts_with("message new\n"));
    assert!(report.contains("via_new ("));
}

#[test]
fn test_recovered_panic_reports_category() {
    let err = via_recover();
    assert_eq!(err.type_name(), "panic");
    assert!(err.full_report().starts_with("panic recovered\n"));
}
