//! Execution ledger: which tests are pending, which ran, and when the run started and finished.
//!
//! ## Invariants
//!
//! - Test ids are dense, `0..n` in flattening order.
//! - An id is in `queue` exactly while its thunk is in `available`; both are removed in the same
//!   dispatch step that appends the result to `completed`.
//! - `finish_time` is set at most once.

use std::collections::{BTreeMap, VecDeque};

use testloom_core::{Seed, TestRun, Thunk};

use super::Cmd;
use crate::clock::Timestamp;

/// Position of a test in flattening order.
pub type TestId = usize;

#[derive(Debug)]
pub struct Ledger {
    available: BTreeMap<TestId, Thunk>,
    queue: VecDeque<TestId>,
    completed: Vec<TestRun>,
    start_time: Timestamp,
    finish_time: Option<Timestamp>,
    seed: Seed,
}

impl Ledger {
    /// Build the started ledger: every thunk is available and queued, nothing has completed.
    pub fn start(start_time: Timestamp, seed: Seed, thunks: Vec<Thunk>) -> Self {
        let available: BTreeMap<TestId, Thunk> = thunks.into_iter().enumerate().collect();
        let queue = available.keys().copied().collect();

        Self {
            available,
            queue,
            completed: Vec::new(),
            start_time,
            finish_time: None,
            seed,
        }
    }

    /// Run the next queued test, or ask for the finish time once the queue is empty.
    ///
    /// Executes at most one test per call. Every call that ran (or skipped) a test returns
    /// [`Cmd::Dispatch`] so the host schedules the next step as a separate unit of work.
    #[tracing::instrument(skip_all, fields(queued = self.queue.len()))]
    pub fn dispatch(mut self) -> (Self, Cmd) {
        let Some(test_id) = self.queue.pop_front() else {
            return (self, Cmd::RequestFinishTime);
        };

        match self.available.remove(&test_id) {
            Some(thunk) => {
                tracing::debug!(test_id, labels = ?thunk.labels(), "running test");
                self.completed.push(thunk.run());
            }
            None => {
                tracing::warn!(test_id, "queued test id has no runnable; skipping it");
            }
        }

        (self, Cmd::Dispatch)
    }

    /// Record the finish time. A second finish is ignored.
    pub fn finish(mut self, now: Timestamp) -> Self {
        match self.finish_time {
            None => self.finish_time = Some(now),
            Some(finish_time) => {
                tracing::warn!(
                    finish_time = finish_time.as_millis(),
                    ignored = now.as_millis(),
                    "received finish signal after the run already finished"
                );
            }
        }
        self
    }

    pub fn queue(&self) -> &VecDeque<TestId> {
        &self.queue
    }

    /// Number of tests still waiting to run.
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    pub fn available_ids(&self) -> impl Iterator<Item = TestId> + '_ {
        self.available.keys().copied()
    }

    /// Results in dispatch order.
    pub fn completed(&self) -> &[TestRun] {
        &self.completed
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn finish_time(&self) -> Option<Timestamp> {
        self.finish_time
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }
}
