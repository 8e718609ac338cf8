#![allow(dead_code)]

use mcreflow::{Reflow, reflow};

/// Helper: reflow `input` with the builtin table and compare statements.
pub fn assert_reflow(input: &str, expected: &[&str]) -> Reflow {
    let result = reflow(input);
    assert_eq!(
        result.lines(),
        expected,
        "reflow mismatch\n--- input ---\n{input}\n--- diagnostics ---\n{:?}",
        result.diagnostics
    );
    result
}

/// Helper: reflow, then reflow the canonical output again and require
/// that nothing changes.
pub fn assert_idempotent(input: &str) {
    let first = reflow(input);
    let canonical = first.to_source();
    let second = reflow(&canonical);
    assert_eq!(
        second.to_source(),
        canonical,
        "reflow is not idempotent\n--- input ---\n{input}\n--- canonical ---\n{canonical}"
    );
}

/// Helper: reflow with the builtin table and require no diagnostics at all.
pub fn reflow_clean(input: &str) -> Vec<String> {
    let result = reflow(input);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}\n--- input ---\n{input}",
        result.diagnostics
    );
    result.lines()
}
