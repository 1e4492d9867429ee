use std::{fmt::Display, time::Duration};

use crate::test::TestResult;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TestOutcome {
    pub status: TestStatus,
    pub duration: Duration,
}

impl TestOutcome {
    pub fn is_good(&self) -> bool {
        self.status.is_good()
    }

    pub fn is_bad(&self) -> bool {
        self.status.is_bad()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestStatus {
    Passed,
    Ignored,
    Failed(TestFailure),
}

impl TestStatus {
    pub fn is_good(&self) -> bool {
        matches!(self, TestStatus::Passed | TestStatus::Ignored)
    }

    pub fn is_bad(&self) -> bool {
        matches!(self, TestStatus::Failed(_))
    }
}

impl TestStatus {
    pub fn passed(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }

    pub fn ignored(&self) -> bool {
        matches!(self, TestStatus::Ignored)
    }

    pub fn failed(&self) -> bool {
        matches!(self, TestStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestFailure {
    /// The body returned an `Err`.
    Error(String),

    /// The body panicked.
    Panicked(String),

    /// A hook around the test failed.
    Hook { hook: HookKind, message: String },
}

impl Display for TestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestFailure::Error(msg) | TestFailure::Panicked(msg) => f.write_str(msg),
            TestFailure::Hook { hook, message } => write!(f, "{} failed: {message}", hook.label()),
        }
    }
}

/// The hook kinds a suite can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Before,
    After,
    BeforeEach,
    AfterEach,
}

impl HookKind {
    /// The label used in report titles, like `"before all" hook`.
    pub const fn label(self) -> &'static str {
        match self {
            HookKind::Before => "\"before all\" hook",
            HookKind::After => "\"after all\" hook",
            HookKind::BeforeEach => "\"before each\" hook",
            HookKind::AfterEach => "\"after each\" hook",
        }
    }
}

impl From<TestResult> for TestStatus {
    fn from(value: TestResult) -> Self {
        match value.0 {
            Ok(_) => TestStatus::Passed,
            Err(err) => TestStatus::Failed(TestFailure::Error(err)),
        }
    }
}
