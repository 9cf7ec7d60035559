//! Wall-clock collaborator.
//!
//! The model never reads the clock itself. The host asks a [`Clock`] for the current time when a
//! command requests it and delivers the answer back as a message.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is later.
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Timestamp(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}

/// A clock that hands out a fixed sequence of timestamps.
///
/// Once the sequence is exhausted the last timestamp is repeated.
#[derive(Debug)]
pub struct ScriptedClock {
    times: RefCell<VecDeque<Timestamp>>,
    last: RefCell<Timestamp>,
}

impl ScriptedClock {
    pub fn new(times: impl IntoIterator<Item = u64>) -> Self {
        Self {
            times: RefCell::new(times.into_iter().map(Timestamp).collect()),
            last: RefCell::new(Timestamp(0)),
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> Timestamp {
        if let Some(next) = self.times.borrow_mut().pop_front() {
            *self.last.borrow_mut() = next;
        }
        *self.last.borrow()
    }
}
