use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
};

use crate::{
    outcome::{TestFailure, TestStatus},
    test::TestResult,
};

pub(crate) fn downcast_panic_err(err: Box<dyn Any + Send + 'static>) -> String {
    err.downcast::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|err| err.downcast::<String>().map(|s| *s))
        .unwrap_or_else(|_| String::from("non-string panic payload"))
}

/// Run a test or hook body, turning a panic into [`TestFailure::Panicked`].
pub(crate) fn handle<F: FnOnce() -> TestResult>(f: F) -> TestStatus {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result.into(),
        Err(err) => TestStatus::Failed(TestFailure::Panicked(downcast_panic_err(err))),
    }
}
