//! Reporting a run while it happens.
//!
//! The harness turns every step of a run into a [`SuiteEvent`] and hands it
//! to a [`SuiteReporter`] running on its own thread. Reporters only observe,
//! they cannot influence the run. Errors they return are collected into
//! [`SuiteReport::report_errors`](crate::SuiteReport::report_errors).

use std::time::Duration;

use crate::outcome::TestOutcome;

mod no;
pub use no::*;

mod logging;
pub use logging::*;

mod plain;
pub use plain::*;

/// One step of a run, in the order the harness takes them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuiteEvent {
    /// The run starts with this many declared tests, pending ones included.
    RunStart { tests: usize },

    /// A suite is entered. The root suite has depth 0.
    SuiteStart { title: String, depth: usize },

    /// A test is pending and will not run.
    TestPending { title: String },

    /// A test, or a `before all`/`after all` hook, finished.
    TestOutcome { title: String, outcome: TestOutcome },

    /// The run is over.
    RunEnd(RunSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub(crate) fn tally(outcomes: &[(String, TestOutcome)], duration: Duration) -> Self {
        outcomes.iter().fold(
            RunSummary {
                duration,
                ..Default::default()
            },
            |mut summary, (_, outcome)| {
                let status = &outcome.status;
                summary.passed += status.passed() as usize;
                summary.failed += status.failed() as usize;
                summary.ignored += status.ignored() as usize;
                summary
            },
        )
    }
}

/// Receives the [`SuiteEvent`]s of a run.
pub trait SuiteReporter {
    type Error;

    fn report(&mut self, event: &SuiteEvent) -> Result<(), Self::Error>;
}
