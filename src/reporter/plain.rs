use std::io;

use crate::{
    outcome::{TestFailure, TestStatus},
    reporter::{SuiteEvent, SuiteReporter},
};

/// A reporter writing libtest-like lines to `target`.
///
/// ```text
/// running 3 tests
/// test db migrates ... ok
/// test db reconnects ... ignored
/// test db rolls back ... FAILED
///
/// failures:
///     db rolls back: boom
///
/// test result: FAILED. 1 passed; 1 failed; 1 ignored; finished in 0.01s
/// ```
#[derive(Debug)]
pub struct PlainReporter<W: io::Write> {
    target: W,
    failures: Vec<(String, TestFailure)>,
}

impl Default for PlainReporter<io::Stdout> {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: io::Write> PlainReporter<W> {
    pub fn new(target: W) -> Self {
        Self {
            target,
            failures: Vec::new(),
        }
    }
}

impl<W: io::Write> SuiteReporter for PlainReporter<W> {
    type Error = io::Error;

    fn report(&mut self, event: &SuiteEvent) -> Result<(), Self::Error> {
        match event {
            SuiteEvent::RunStart { tests } => writeln!(self.target, "\nrunning {tests} tests"),
            SuiteEvent::SuiteStart { .. } => Ok(()),
            SuiteEvent::TestPending { title } => writeln!(self.target, "test {title} ... ignored"),
            SuiteEvent::TestOutcome { title, outcome } => match &outcome.status {
                TestStatus::Failed(failure) => {
                    self.failures.push((title.clone(), failure.clone()));
                    writeln!(self.target, "test {title} ... FAILED")
                }
                _ => writeln!(self.target, "test {title} ... ok"),
            },
            SuiteEvent::RunEnd(summary) => {
                if !self.failures.is_empty() {
                    writeln!(self.target, "\nfailures:")?;
                    for (title, failure) in &self.failures {
                        writeln!(self.target, "    {title}: {failure}")?;
                    }
                }

                let result = match summary.failed {
                    0 => "ok",
                    _ => "FAILED",
                };
                writeln!(
                    self.target,
                    "\ntest result: {result}. {} passed; {} failed; {} ignored; finished in {:.2}s\n",
                    summary.passed,
                    summary.failed,
                    summary.ignored,
                    summary.duration.as_secs_f64()
                )
            }
        }
    }
}
