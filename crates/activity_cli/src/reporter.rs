//! Failure reporting for GitHub Actions.
//!
//! The runner scans step output for workflow commands. A failure is written as an
//! `::error::` command so it shows up as an annotation on the run, and the process
//! exit status is derived from whether anything was reported.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use activity_core::{ActivityError, FailureReporter};
use tracing::{error, warn};

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;

/// Reports failures as GitHub Actions `::error::` workflow commands.
pub struct WorkflowCommandReporter<W: Write + Send> {
    out: Mutex<W>,
    failed: AtomicBool,
}

impl WorkflowCommandReporter<std::io::Stdout> {
    /// Creates a reporter writing to standard output, where the runner reads commands.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> WorkflowCommandReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            failed: AtomicBool::new(false),
        }
    }

    /// Whether any failure has been reported.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Consumes the reporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> FailureReporter for WorkflowCommandReporter<W> {
    fn report(&self, failure: &ActivityError) {
        self.failed.store(true, Ordering::SeqCst);
        error!(error = %failure, "Marking run as failed");

        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let command = format!("::error::{}", escape_data(&failure.to_string()));
        if let Err(e) = writeln!(out, "{}", command).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write workflow command");
        }
    }
}

/// Escapes a message so it survives as the data part of a workflow command.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
