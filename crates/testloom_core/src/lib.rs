//! Provide the suite vocabulary that testloom suites are written against.
//!
//! This crate holds everything that is independent of how a run is hosted:
//! - expectations and the helpers that produce them (`expectation`, `expect`),
//! - the declarative suite tree (`suite`),
//! - the execution collaborator that turns a suite into runnables for a seed and run count (`runner`),
//! - the flattener that turns a runner tree into an ordered list of thunks (`flatten`).
//!
//! ## Notes
//!
//! - No async runtime, no clock, no IO. The host crate owns scheduling and time.
//! - Test failures are values ([`Expectation::Fail`]), never errors or panics that escape a thunk.

pub mod expect;
pub mod expectation;
pub mod flatten;
pub mod runner;
pub mod suite;

pub use proptest;

pub use expectation::{Expectation, Failure};
pub use flatten::{TestRun, Thunk, flatten};
pub use runner::{DEFAULT_RUNS, Runner, Seed, resolve};
pub use suite::{Suite, batch, describe, fuzz, test, test_many};
