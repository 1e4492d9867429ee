use std::convert::Infallible;

use crate::reporter::{SuiteEvent, SuiteReporter};

/// A reporter that discards every event.
#[derive(Debug, Default, Clone)]
pub struct NoReporter;

impl SuiteReporter for NoReporter {
    type Error = Infallible;

    fn report(&mut self, _: &SuiteEvent) -> Result<(), Self::Error> {
        Ok(())
    }
}
