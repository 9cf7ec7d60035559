//! Flatten a [`Runner`] tree into an ordered list of thunks.
//!
//! ## Notes
//!
//! - Order is depth-first, left to right: the order tests were declared in.
//! - A label path lists the nearest enclosing label first.
//! - Uses an explicit work stack, so deep suites do not grow the call stack.

use crate::expectation::{Expectation, Failure};
use crate::runner::{Runnable, Runner};

/// One flattened test: its label path plus the deferred body.
pub struct Thunk {
    labels: Vec<String>,
    body: Runnable,
}

impl Thunk {
    /// Labels from the test's own name outwards.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Execute the test body. This is the only place test code runs.
    pub fn run(self) -> TestRun {
        let outcomes = (self.body)();
        TestRun {
            labels: self.labels,
            outcomes,
        }
    }
}

impl std::fmt::Debug for Thunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thunk").field("labels", &self.labels).finish_non_exhaustive()
    }
}

/// The result of executing one [`Thunk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    pub labels: Vec<String>,
    pub outcomes: Vec<Expectation>,
}

impl TestRun {
    /// A test passes when every outcome passes.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(Expectation::is_pass)
    }

    /// The non-passing outcomes, in order.
    pub fn failures(&self) -> Vec<Failure> {
        self.outcomes.iter().filter_map(Expectation::failure).cloned().collect()
    }
}

/// Flatten a runner tree.
///
/// ## Returns
/// - (`Vec<Thunk>`): one thunk per runnable leaf, in declaration order. Empty batches contribute
///   nothing.
pub fn flatten(runner: Runner) -> Vec<Thunk> {
    let mut thunks = Vec::new();
    // Each entry is a label plus the index of its enclosing label, so siblings share one prefix.
    let mut labels: Vec<(String, Option<usize>)> = Vec::new();
    let mut stack: Vec<(Runner, Option<usize>)> = vec![(runner, None)];

    while let Some((node, enclosing)) = stack.pop() {
        match node {
            Runner::Runnable(body) => thunks.push(Thunk {
                labels: label_path(&labels, enclosing),
                body,
            }),
            Runner::Labeled(label, inner) => {
                labels.push((label, enclosing));
                stack.push((*inner, Some(labels.len() - 1)));
            }
            Runner::Batch(children) => {
                // reversed so the first child is popped first
                for child in children.into_iter().rev() {
                    stack.push((child, enclosing));
                }
            }
        }
    }

    thunks
}

/// Collect a label path, nearest label first.
fn label_path(labels: &[(String, Option<usize>)], mut next: Option<usize>) -> Vec<String> {
    let mut path = Vec::new();
    while let Some(index) = next {
        let (label, parent) = &labels[index];
        path.push(label.clone());
        next = *parent;
    }
    path
}
