//! Expectation outcomes produced by test bodies.

use std::fmt;

/// Describe why a single expectation did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// The generated input that produced the failure (fuzz tests only).
    pub given: Option<String>,
    pub message: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            given: None,
            message: message.into(),
        }
    }

    /// Attach the input description a fuzz run failed on.
    pub fn with_given(mut self, given: impl Into<String>) -> Self {
        self.given = Some(given.into());
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.given {
            Some(given) => write!(f, "Given {}\n\n{}", given, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The outcome of one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Pass,
    Fail(Failure),
}

impl Expectation {
    pub fn pass() -> Self {
        Expectation::Pass
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Expectation::Fail(Failure::new(message))
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Expectation::Pass)
    }

    /// Return the failure details, or `None` for a passing expectation.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Expectation::Pass => None,
            Expectation::Fail(failure) => Some(failure),
        }
    }
}
