//! The declarative suite tree.
//!
//! A [`Suite`] is supplied once when the program is built and never changes afterwards. It is
//! turned into a [`Runner`](crate::runner::Runner) by [`resolve`](crate::runner::resolve) once the
//! seed and run count are known.
//!
//! ## Notes
//!
//! - `test`, `fuzz` and `describe` wrap their body in a label, so a label path always runs from the
//!   test's own name outwards to the outermost `describe`.

use std::fmt;

use proptest::strategy::Strategy;

use crate::expectation::Expectation;
use crate::runner::{FuzzProperty, Seed};

/// Body of a unit test. May produce several expectations.
pub type UnitBody = Box<dyn Fn() -> Vec<Expectation>>;

/// A property that is checked `runs` times with inputs drawn from a seeded source.
pub trait Property {
    /// Check the property and report the outcomes.
    ///
    /// ## Parameters
    /// - `runs`: how many generated inputs to try.
    /// - `seed`: the seed the generated inputs derive from.
    fn check(&self, runs: u32, seed: Seed) -> Vec<Expectation>;
}

/// One runnable test leaf.
pub enum TestBody {
    Unit(UnitBody),
    Fuzz(Box<dyn Property>),
}

/// A hierarchical test declaration.
pub enum Suite {
    Single(TestBody),
    Labeled(String, Box<Suite>),
    Batch(Vec<Suite>),
}

impl Suite {
    /// Count the runnable leaves of the tree.
    pub fn count_tests(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Suite::Single(_) => count += 1,
                Suite::Labeled(_, inner) => stack.push(inner),
                Suite::Batch(children) => stack.extend(children.iter()),
            }
        }
        count
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suite::Single(TestBody::Unit(_)) => f.write_str("Unit"),
            Suite::Single(TestBody::Fuzz(_)) => f.write_str("Fuzz"),
            Suite::Labeled(label, inner) => f.debug_tuple("Labeled").field(label).field(inner).finish(),
            Suite::Batch(children) => f.debug_list().entries(children).finish(),
        }
    }
}

/// Declare a unit test with a single expectation.
pub fn test(label: impl Into<String>, body: impl Fn() -> Expectation + 'static) -> Suite {
    test_many(label, move || vec![body()])
}

/// Declare a unit test whose body produces several expectations.
pub fn test_many(label: impl Into<String>, body: impl Fn() -> Vec<Expectation> + 'static) -> Suite {
    Suite::Labeled(label.into(), Box::new(Suite::Single(TestBody::Unit(Box::new(body)))))
}

/// Declare a fuzz test: `property` is checked against inputs drawn from `strategy`.
pub fn fuzz<S, F>(strategy: S, label: impl Into<String>, property: F) -> Suite
where
    S: Strategy + 'static,
    F: Fn(S::Value) -> Expectation + 'static,
{
    let property = FuzzProperty::new(strategy, property);
    Suite::Labeled(label.into(), Box::new(Suite::Single(TestBody::Fuzz(Box::new(property)))))
}

/// Group suites under a shared label.
pub fn describe(label: impl Into<String>, suites: Vec<Suite>) -> Suite {
    Suite::Labeled(label.into(), Box::new(Suite::Batch(suites)))
}

/// Group suites without a label.
pub fn batch(suites: Vec<Suite>) -> Suite {
    Suite::Batch(suites)
}
