//! Turn a declared [`Suite`] into runnables for a given seed and run count.
//!
//! The [`Runner`] tree has the same shape as the suite it was resolved from. Each
//! [`Runner::Runnable`] is deferred: nothing executes until the dispatch loop calls it.
//!
//! ## Notes
//!
//! - Fuzz leaves use `proptest`'s `TestRunner`, seeded per leaf so a whole run is reproducible from
//!   one [`Seed`] while sibling fuzz tests still see different inputs.
//! - Failure persistence is disabled: a run never writes regression files.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use proptest::strategy::Strategy;
use proptest::test_runner::{Config, RngAlgorithm, TestCaseError, TestError, TestRng, TestRunner};

use crate::expectation::{Expectation, Failure};
use crate::suite::{Property, Suite, TestBody, UnitBody};

/// Number of generated inputs per fuzz test when none is configured.
pub const DEFAULT_RUNS: u32 = 100;

/// Seed for the random source that drives fuzz tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(pub u32);

impl Seed {
    /// Derive a seed from a millisecond timestamp.
    ///
    /// ## Notes
    /// - The timestamp is truncated into the 32-bit seed space (modulo 2^32).
    pub fn from_timestamp_millis(millis: u64) -> Self {
        Seed((millis & u64::from(u32::MAX)) as u32)
    }

    /// Derive the seed for the `leaf`-th test of a suite.
    pub fn derive(self, leaf: u32) -> Self {
        // splitmix32-style finalizer over (seed, leaf)
        let mut z = self.0 ^ leaf.wrapping_mul(0x9E37_79B9);
        z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
        z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
        Seed(z ^ (z >> 16))
    }

    /// Build the deterministic random source for this seed.
    pub fn rng(self) -> TestRng {
        let mut key = [0u8; 32];
        key[..4].copy_from_slice(&self.0.to_le_bytes());
        TestRng::from_seed(RngAlgorithm::ChaCha, &key)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deferred test execution.
pub type Runnable = Box<dyn FnOnce() -> Vec<Expectation>>;

/// Executable counterpart of a [`Suite`].
pub enum Runner {
    Runnable(Runnable),
    Labeled(String, Box<Runner>),
    Batch(Vec<Runner>),
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runner::Runnable(_) => f.write_str("Runnable"),
            Runner::Labeled(label, inner) => f.debug_tuple("Labeled").field(label).field(inner).finish(),
            Runner::Batch(children) => f.debug_list().entries(children).finish(),
        }
    }
}

/// Resolve a suite into a runner tree.
///
/// ## Parameters
/// - `suite`: the declared suite; consumed.
/// - `runs`: generated inputs per fuzz test.
/// - `seed`: the run's seed; each leaf gets its own derivation of it.
///
/// ## Returns
/// - (`Runner`): a tree isomorphic to `suite` whose leaves are deferred runnables.
pub fn resolve(suite: Suite, runs: u32, seed: Seed) -> Runner {
    let mut work = vec![Step::Visit(suite)];
    let mut built: Vec<Runner> = Vec::new();
    let mut next_leaf: u32 = 0;

    while let Some(step) = work.pop() {
        match step {
            Step::Visit(Suite::Single(body)) => {
                let leaf_seed = seed.derive(next_leaf);
                next_leaf = next_leaf.wrapping_add(1);
                built.push(match body {
                    TestBody::Unit(body) => Runner::Runnable(Box::new(move || run_unit(&body))),
                    TestBody::Fuzz(property) => Runner::Runnable(Box::new(move || property.check(runs, leaf_seed))),
                });
            }
            Step::Visit(Suite::Labeled(label, inner)) => {
                work.push(Step::Label(label));
                work.push(Step::Visit(*inner));
            }
            Step::Visit(Suite::Batch(children)) => {
                work.push(Step::Collect(children.len()));
                // reversed so leaves are numbered in declaration order
                work.extend(children.into_iter().rev().map(Step::Visit));
            }
            Step::Label(label) => {
                let inner = built.pop().unwrap_or_else(|| Runner::Batch(Vec::new()));
                built.push(Runner::Labeled(label, Box::new(inner)));
            }
            Step::Collect(count) => {
                let children = built.split_off(built.len().saturating_sub(count));
                built.push(Runner::Batch(children));
            }
        }
    }

    built.pop().unwrap_or_else(|| Runner::Batch(Vec::new()))
}

/// Pending work while rebuilding a suite as a runner tree, children before parents.
enum Step {
    Visit(Suite),
    Label(String),
    Collect(usize),
}

/// Run a unit body, recording a panic as a failure instead of unwinding into the host.
fn run_unit(body: &UnitBody) -> Vec<Expectation> {
    match panic::catch_unwind(AssertUnwindSafe(|| body())) {
        Ok(outcomes) => outcomes,
        Err(payload) => vec![Expectation::fail(format!("test panicked: {}", panic_message(&*payload)))],
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// A property over values drawn from a `proptest` strategy.
pub struct FuzzProperty<S, F> {
    strategy: S,
    property: F,
}

impl<S, F> FuzzProperty<S, F> {
    pub fn new(strategy: S, property: F) -> Self {
        Self { strategy, property }
    }
}

impl<S, F> Property for FuzzProperty<S, F>
where
    S: Strategy,
    F: Fn(S::Value) -> Expectation,
{
    fn check(&self, runs: u32, seed: Seed) -> Vec<Expectation> {
        let config = Config {
            cases: runs,
            failure_persistence: None,
            ..Config::default()
        };
        let mut runner = TestRunner::new_with_rng(config, seed.rng());

        let result = runner.run(&self.strategy, |value| match (self.property)(value) {
            Expectation::Pass => Ok(()),
            Expectation::Fail(failure) => Err(TestCaseError::fail(failure.message)),
        });

        match result {
            Ok(()) => vec![Expectation::Pass],
            Err(TestError::Fail(reason, value)) => vec![Expectation::Fail(
                Failure::new(reason.message()).with_given(format!("{:?}", value)),
            )],
            Err(TestError::Abort(reason)) => {
                vec![Expectation::fail(format!("fuzz run aborted: {}", reason.message()))]
            }
        }
    }
}
