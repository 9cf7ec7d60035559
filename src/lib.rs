#![forbid(unsafe_code)]
//! testloom: an incremental test-execution front end
//!
//! A suite of unit and fuzz tests is flattened into an ordered queue and executed one test per
//! host turn, so whatever is watching the run (a terminal, a UI) stays responsive. The progress
//! model is a small state machine; renderers only ever see its [`Snapshot`](app::Snapshot).
//!
//! ## Layout
//!
//! - `app` - model, messages, `update`, the execution ledger and the snapshot projector
//! - `host` - cooperative event loop that drives the model and publishes snapshots
//! - `clock` - wall-clock collaborator
//! - `report` - console and JSON reporters
//! - `cli` - command-line entry point for test binaries
//!
//! Suites are declared with the re-exported [`testloom_core`] vocabulary.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test bodies**: a panicking unit test is recorded as a failure, never propagated.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod host;
pub mod report;
pub mod version;

pub use testloom_core::proptest;
pub use testloom_core::{Expectation, Failure, Seed, Suite, batch, describe, expect, fuzz, test, test_many};

pub use app::{Cmd, LifecycleError, Model, Msg, Snapshot, update, view};
pub use clock::{Clock, SystemClock, Timestamp};
pub use config::RunConfig;
pub use host::{Program, RunOutcome};
