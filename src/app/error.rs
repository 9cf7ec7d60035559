//! Lifecycle contract violations.
//!
//! These are host bugs, not test failures. A failing test is recorded as data in the ledger.

use miette::Diagnostic;
use thiserror::Error;

/// A signal arrived that the lifecycle does not allow in the current state.
#[derive(Debug, Error, Diagnostic)]
pub enum LifecycleError {
    #[error("received a start signal, but the run has already started")]
    #[diagnostic(
        code(testloom::lifecycle::already_started),
        help("the host must deliver exactly one start signal")
    )]
    AlreadyStarted,

    #[error("received a {signal} signal before the run started")]
    #[diagnostic(
        code(testloom::lifecycle::not_started),
        help("deliver the start signal before any dispatch or finish signal")
    )]
    NotStarted { signal: &'static str },
}
