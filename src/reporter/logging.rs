use std::convert::Infallible;

use crate::{
    outcome::TestStatus,
    reporter::{SuiteEvent, SuiteReporter},
};

/// A reporter that forwards events to the [`log`] facade.
///
/// Passing and pending tests go to `info`, failures to `warn`. Entering a
/// suite is `debug`.
#[derive(Debug, Default, Clone)]
pub struct LogReporter;

impl SuiteReporter for LogReporter {
    type Error = Infallible;

    fn report(&mut self, event: &SuiteEvent) -> Result<(), Self::Error> {
        match event {
            SuiteEvent::RunStart { tests } => log::info!("running {tests} tests"),
            SuiteEvent::SuiteStart { title, depth } => log::debug!("suite `{title}` (depth {depth})"),
            SuiteEvent::TestPending { title } => log::info!("test {title} ... ignored"),
            SuiteEvent::TestOutcome { title, outcome } => match &outcome.status {
                TestStatus::Failed(failure) => log::warn!("test {title} ... FAILED: {failure}"),
                _ => log::info!("test {title} ... ok ({:?})", outcome.duration),
            },
            SuiteEvent::RunEnd(summary) => log::info!(
                "{} passed; {} failed; {} ignored; finished in {:.2}s",
                summary.passed,
                summary.failed,
                summary.ignored,
                summary.duration.as_secs_f64()
            ),
        }
        Ok(())
    }
}
