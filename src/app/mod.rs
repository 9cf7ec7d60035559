//! The execution state machine.
//!
//! ## Lifecycle
//!
//! A [`Model`] starts as `NotStarted`, holding the suite and the fuzz settings. The first
//! [`Msg::Start`] resolves the suite for a seed, flattens it and builds the [`Ledger`]. From then
//! on each [`Msg::Dispatch`] runs exactly one test and asks the host for another dispatch, until
//! the queue drains and the host is asked for the finish time.
//!
//! ## Design
//!
//! [`update`] is a total function over (message, model) pairs. It consumes the model and returns
//! the next one plus at most one [`Cmd`] for the host to perform. It never sleeps, never reads the
//! clock and never loops over the queue.

pub mod error;
pub mod ledger;
pub mod snapshot;

use testloom_core::{Seed, Suite, flatten, resolve};

use crate::clock::Timestamp;
use crate::config::RunConfig;

pub use error::LifecycleError;
pub use ledger::{Ledger, TestId};
pub use snapshot::{FailedTest, Snapshot, view};

/// Execution progress.
#[derive(Debug)]
pub enum Model {
    NotStarted {
        seed: Option<Seed>,
        runs: u32,
        suite: Suite,
    },
    Started(Ledger),
}

impl Model {
    /// Build the initial model and the command that requests the start time.
    pub fn init(suite: Suite, config: &RunConfig) -> (Model, Cmd) {
        let model = Model::NotStarted {
            seed: config.seed,
            runs: config.runs,
            suite,
        };
        (model, Cmd::RequestStartTime)
    }

    /// The seed in effect: the explicit one before start, the resolved one after.
    pub fn seed(&self) -> Option<Seed> {
        match self {
            Model::NotStarted { seed, .. } => *seed,
            Model::Started(ledger) => Some(ledger.seed()),
        }
    }
}

/// Signals the host delivers to [`update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Start(Timestamp),
    Dispatch,
    Finish(Timestamp),
}

impl Msg {
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Start(_) => "start",
            Msg::Dispatch => "dispatch",
            Msg::Finish(_) => "finish",
        }
    }
}

/// Side effects requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    None,
    /// Read the clock and deliver [`Msg::Start`].
    RequestStartTime,
    /// Deliver [`Msg::Dispatch`] as a fresh unit of work.
    Dispatch,
    /// Read the clock and deliver [`Msg::Finish`].
    RequestFinishTime,
}

/// Advance the model by one message.
///
/// ## Errors
///
/// Returns a [`LifecycleError`] when the host breaks the lifecycle contract: a second start, or
/// a dispatch/finish before the first start. Both are fatal.
pub fn update(msg: Msg, model: Model) -> Result<(Model, Cmd), LifecycleError> {
    match (msg, model) {
        (Msg::Start(now), Model::NotStarted { seed, runs, suite }) => {
            let seed = seed.unwrap_or_else(|| Seed::from_timestamp_millis(now.as_millis()));
            let thunks = flatten(resolve(suite, runs, seed));
            tracing::info!(tests = thunks.len(), %seed, runs, "starting test run");
            Ok((Model::Started(Ledger::start(now, seed, thunks)), Cmd::Dispatch))
        }
        (Msg::Start(_), Model::Started(_)) => Err(LifecycleError::AlreadyStarted),
        (Msg::Dispatch, Model::Started(ledger)) => {
            let (ledger, cmd) = ledger.dispatch();
            Ok((Model::Started(ledger), cmd))
        }
        (Msg::Finish(now), Model::Started(ledger)) => Ok((Model::Started(ledger.finish(now)), Cmd::None)),
        (msg @ (Msg::Dispatch | Msg::Finish(_)), Model::NotStarted { .. }) => {
            Err(LifecycleError::NotStarted { signal: msg.name() })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use testloom_core::{expect, suite};

    fn not_started(suite: Suite) -> Model {
        Model::init(suite, &RunConfig::default()).0
    }

    #[test]
    fn test_init_requests_start_time() {
        let (model, cmd) = Model::init(suite::batch(Vec::new()), &RunConfig::default());
        assert!(matches!(model, Model::NotStarted { runs: 100, seed: None, .. }));
        assert_eq!(cmd, Cmd::RequestStartTime);
    }

    #[test]
    fn test_start_dispatches() {
        let model = not_started(suite::test("one", expect::pass));
        let (model, cmd) = update(Msg::Start(Timestamp::from_millis(5)), model).unwrap();
        assert_eq!(cmd, Cmd::Dispatch);
        let Model::Started(ledger) = &model else {
            panic!("expected Started");
        };
        assert_eq!(ledger.queue().len(), 1);
        assert_eq!(ledger.start_time(), Timestamp::from_millis(5));
    }

    #[test]
    fn test_seed_falls_back_to_start_time() {
        let model = not_started(suite::batch(Vec::new()));
        let (model, _) = update(Msg::Start(Timestamp::from_millis(1234)), model).unwrap();
        assert_eq!(model.seed(), Some(Seed(1234)));
    }

    #[test]
    fn test_explicit_seed_wins() {
        let config = RunConfig::new().with_seed(Seed(9));
        let (model, _) = Model::init(suite::batch(Vec::new()), &config);
        let (model, _) = update(Msg::Start(Timestamp::from_millis(1234)), model).unwrap();
        assert_eq!(model.seed(), Some(Seed(9)));
    }

    #[test]
    fn test_second_start_is_fatal() {
        let model = not_started(suite::batch(Vec::new()));
        let (model, _) = update(Msg::Start(Timestamp::from_millis(1)), model).unwrap();
        let err = update(Msg::Start(Timestamp::from_millis(2)), model).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyStarted));
    }

    #[test]
    fn test_signals_before_start_are_fatal() {
        let err = update(Msg::Dispatch, not_started(suite::batch(Vec::new()))).unwrap_err();
        assert!(matches!(err, LifecycleError::NotStarted { signal: "dispatch" }));

        let err = update(Msg::Finish(Timestamp::from_millis(1)), not_started(suite::batch(Vec::new()))).unwrap_err();
        assert!(matches!(err, LifecycleError::NotStarted { signal: "finish" }));
    }

    #[test]
    fn test_finish_requests_nothing() {
        let model = not_started(suite::batch(Vec::new()));
        let (model, _) = update(Msg::Start(Timestamp::from_millis(1)), model).unwrap();
        let (model, cmd) = update(Msg::Dispatch, model).unwrap();
        assert_eq!(cmd, Cmd::RequestFinishTime);
        let (_, cmd) = update(Msg::Finish(Timestamp::from_millis(2)), model).unwrap();
        assert_eq!(cmd, Cmd::None);
    }
}
