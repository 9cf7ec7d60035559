//! Assertion helpers for test bodies.
//!
//! Each helper returns an [`Expectation`] instead of panicking, so a failing assertion is recorded
//! and the run continues:
//! - `equal`, `not_equal`, `is_true`, `is_false`, `ok`, `all`, `pass`, `fail`

use std::fmt::Debug;

use crate::expectation::{Expectation, Failure};

/// Expect two values to be equal.
pub fn equal<T: PartialEq + Debug>(left: T, right: T) -> Expectation {
    if left == right {
        Expectation::Pass
    } else {
        Expectation::fail(format!(
            "assertion failed: left != right\n  left:  {:?}\n  right: {:?}",
            left, right
        ))
    }
}

/// Expect two values to differ.
pub fn not_equal<T: PartialEq + Debug>(left: T, right: T) -> Expectation {
    if left != right {
        Expectation::Pass
    } else {
        Expectation::fail(format!(
            "assertion failed: left == right\n  left:  {:?}\n  right: {:?}",
            left, right
        ))
    }
}

/// Expect a condition to hold, failing with `message` otherwise.
pub fn is_true(condition: bool, message: &str) -> Expectation {
    if condition {
        Expectation::Pass
    } else {
        Expectation::fail(message)
    }
}

/// Expect a condition not to hold, failing with `message` otherwise.
pub fn is_false(condition: bool, message: &str) -> Expectation {
    is_true(!condition, message)
}

/// Expect a `Result` to be `Ok`.
pub fn ok<T, E: Debug>(result: &Result<T, E>) -> Expectation {
    match result {
        Ok(_) => Expectation::Pass,
        Err(err) => Expectation::fail(format!("expected Ok, got Err({:?})", err)),
    }
}

/// Combine expectations, keeping the first failure.
pub fn all(expectations: impl IntoIterator<Item = Expectation>) -> Expectation {
    expectations
        .into_iter()
        .find(|e| !e.is_pass())
        .unwrap_or(Expectation::Pass)
}

pub fn pass() -> Expectation {
    Expectation::Pass
}

/// Explicitly fail a test with a message.
pub fn fail(message: impl Into<String>) -> Expectation {
    Expectation::Fail(Failure::new(message))
}
