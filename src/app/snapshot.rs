//! Presentation projector: a pure mapping from [`Model`] to a renderable [`Snapshot`].

use std::time::Duration;

use testloom_core::{Failure, TestRun};

use super::Model;
use super::ledger::Ledger;

/// A completed test with at least one non-passing outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTest {
    /// Nearest label first.
    pub labels: Vec<String>,
    pub failures: Vec<Failure>,
}

impl FailedTest {
    /// Labels outermost first, joined for display.
    pub fn path(&self, separator: &str) -> String {
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        labels.reverse();
        labels.join(separator)
    }
}

/// What a renderer needs to draw the current state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    NotStarted,
    Running {
        completed: usize,
        remaining: usize,
        failures: Vec<FailedTest>,
    },
    Finished {
        duration: Duration,
        passed: usize,
        failures: Vec<FailedTest>,
    },
}

impl Snapshot {
    pub fn is_finished(&self) -> bool {
        matches!(self, Snapshot::Finished { .. })
    }

    pub fn failures(&self) -> &[FailedTest] {
        match self {
            Snapshot::NotStarted => &[],
            Snapshot::Running { failures, .. } | Snapshot::Finished { failures, .. } => failures.as_slice(),
        }
    }
}

/// Project the model into a snapshot.
pub fn view(model: &Model) -> Snapshot {
    match model {
        Model::NotStarted { .. } => Snapshot::NotStarted,
        Model::Started(ledger) => project_ledger(ledger),
    }
}

fn project_ledger(ledger: &Ledger) -> Snapshot {
    let failures = failed_tests(ledger.completed());

    match ledger.finish_time() {
        None => Snapshot::Running {
            completed: ledger.completed().len(),
            remaining: ledger.remaining(),
            failures,
        },
        Some(finish_time) => Snapshot::Finished {
            duration: finish_time.saturating_duration_since(ledger.start_time()),
            passed: ledger.completed().iter().filter(|run| run.passed()).count(),
            failures,
        },
    }
}

fn failed_tests(completed: &[TestRun]) -> Vec<FailedTest> {
    completed
        .iter()
        .filter(|run| !run.passed())
        .map(|run| FailedTest {
            labels: run.labels.clone(),
            failures: run.failures(),
        })
        .collect()
}
