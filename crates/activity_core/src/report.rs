//! Process-level failure reporting.
//!
//! Some failures must not abort the caller: a run without an issue number, or an
//! author lookup that failed while counting pull requests. The accessor hands those
//! to a [`FailureReporter`] and carries on; the reporter decides whether the run as
//! a whole is marked as failed.

use std::sync::Mutex;

use tracing::error;

use crate::errors::ActivityError;

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// Receives failures that should fail the run without interrupting the caller.
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &ActivityError);
}

/// Reporter that only logs failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, failure: &ActivityError) {
        error!(error = %failure, "Run failed");
    }
}

/// Reporter that keeps the failure messages in memory.
///
/// Useful for library callers that want to inspect failures after a sequence of
/// operations and decide on escalation themselves.
///
/// # Examples
///
/// ```rust
/// use activity_core::{ActivityError, FailureReporter, RecordingReporter};
///
/// let reporter = RecordingReporter::new();
/// reporter.report(&ActivityError::MissingActivityContext);
///
/// assert!(reporter.has_failed());
/// assert_eq!(reporter.failures(), vec!["Error retrieving issue number".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of every failure reported so far, oldest first.
    pub fn failures(&self) -> Vec<String> {
        match self.failures.lock() {
            Ok(failures) => failures.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn has_failed(&self) -> bool {
        !self.failures().is_empty()
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, failure: &ActivityError) {
        error!(error = %failure, "Run failed");

        let mut failures = match self.failures.lock() {
            Ok(failures) => failures,
            Err(poisoned) => poisoned.into_inner(),
        };
        failures.push(failure.to_string());
    }
}
