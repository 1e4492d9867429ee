use std::{
    process::{ExitCode, Termination},
    time::Duration,
};

use crate::outcome::TestOutcome;

pub type TestOutcomes = Vec<(String, TestOutcome)>;

/// Everything a finished run produced.
///
/// Outcomes are keyed by full title and kept in execution order.
#[derive(Debug)]
#[non_exhaustive]
pub struct SuiteReport<ReportError> {
    pub outcomes: TestOutcomes,
    pub duration: Duration,
    pub report_errors: Vec<ReportError>,
}

impl<ReportError> SuiteReport<ReportError> {
    pub fn get(&self, title: &str) -> Option<&TestOutcome> {
        self.outcomes
            .iter()
            .find_map(|(t, outcome)| (t == title).then_some(outcome))
    }

    pub fn passed(&self) -> usize {
        self.count(|outcome| outcome.status.passed())
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| outcome.status.failed())
    }

    pub fn ignored(&self) -> usize {
        self.count(|outcome| outcome.status.ignored())
    }

    /// `true` if nothing failed.
    pub fn is_good(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_good())
    }

    fn count(&self, f: impl Fn(&TestOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| f(outcome)).count()
    }
}

impl<ReportError> Termination for SuiteReport<ReportError> {
    fn report(self) -> ExitCode {
        match self.is_good() {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        }
    }
}
