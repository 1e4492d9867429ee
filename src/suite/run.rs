use std::{thread, time::Instant};

use crossbeam_channel::Sender;

use crate::{
    SuiteReport,
    outcome::{HookKind, TestFailure, TestOutcome, TestStatus},
    panic_handler,
    reporter::{NoReporter, RunSummary, SuiteEvent, SuiteReporter},
    suite::Suite,
    test::{Test, TestFnHandle},
};

/// Build a harness that runs `suite` without reporting anything.
pub fn harness(suite: &Suite) -> SuiteHarness<'_, NoReporter> {
    SuiteHarness {
        suite,
        reporter: NoReporter,
    }
}

/// Runs a [`Suite`] in declaration order.
///
/// Tests and hooks run on the calling thread. The reporter lives on its own
/// thread and is fed through a bounded channel, so a slow reporter does not
/// hold up the tests more than the channel allows.
pub struct SuiteHarness<'s, Reporter> {
    pub(crate) suite: &'s Suite,
    pub(crate) reporter: Reporter,
}

impl<'s, Reporter> SuiteHarness<'s, Reporter> {
    pub fn with_reporter<WithReporter: SuiteReporter>(
        self,
        reporter: WithReporter,
    ) -> SuiteHarness<'s, WithReporter> {
        SuiteHarness {
            suite: self.suite,
            reporter,
        }
    }
}

impl<'s, Reporter> SuiteHarness<'s, Reporter>
where
    Reporter: SuiteReporter + Send,
    Reporter::Error: Send,
{
    pub fn run(self) -> SuiteReport<Reporter::Error> {
        let now = Instant::now();
        let suite = self.suite;
        let mut reporter = self.reporter;

        let (outcomes, report_errors) = thread::scope(move |scope| {
            let (tx, rx) = crossbeam_channel::bounded::<SuiteEvent>(64);
            let report_thread = scope.spawn(move || {
                let mut errors = Vec::new();
                while let Ok(event) = rx.recv() {
                    if let Err(err) = reporter.report(&event) {
                        errors.push(err);
                    }
                }
                errors
            });

            let mut walker = Walker {
                tx,
                path: Vec::new(),
                outcomes: Vec::new(),
            };
            walker.send(SuiteEvent::RunStart {
                tests: suite.test_count(),
            });
            walker.run_suite(suite, false);

            let summary = RunSummary::tally(&walker.outcomes, now.elapsed());
            walker.send(SuiteEvent::RunEnd(summary));

            let Walker { tx, outcomes, .. } = walker;
            drop(tx);
            let errors = report_thread
                .join()
                .expect("report thread should join without issues");
            (outcomes, errors)
        });

        SuiteReport {
            outcomes,
            duration: now.elapsed(),
            report_errors,
        }
    }
}

struct Walker<'s> {
    tx: Sender<SuiteEvent>,
    path: Vec<&'s Suite>,
    outcomes: Vec<(String, TestOutcome)>,
}

impl<'s> Walker<'s> {
    fn send(&self, event: SuiteEvent) {
        // A reporter that hung up only loses its own output.
        let _ = self.tx.send(event);
    }

    fn full_title(&self, last: &str) -> String {
        self.path
            .iter()
            .map(|suite| suite.title())
            .chain([last])
            .filter(|title| !title.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn record(&mut self, title: String, outcome: TestOutcome) {
        self.send(SuiteEvent::TestOutcome {
            title: title.clone(),
            outcome: outcome.clone(),
        });
        self.outcomes.push((title, outcome));
    }

    fn pending(&mut self, title: String) {
        log::trace!("test `{title}` is pending");
        self.send(SuiteEvent::TestPending {
            title: title.clone(),
        });
        self.outcomes.push((
            title,
            TestOutcome {
                status: TestStatus::Ignored,
                duration: Default::default(),
            },
        ));
    }

    fn run_suite(&mut self, suite: &'s Suite, pending: bool) {
        let pending = pending || suite.ignore().is_ignored();
        self.send(SuiteEvent::SuiteStart {
            title: suite.title().to_string(),
            depth: self.path.len(),
        });
        self.path.push(suite);

        if pending {
            self.mark_pending(suite);
            self.path.pop();
            return;
        }

        match self.run_suite_hooks(suite, HookKind::Before) {
            Some(outcome) => {
                log::debug!("skipping suite `{}` after a failed before hook", suite.title());
                let title = self.full_title(HookKind::Before.label());
                self.record(title, outcome);
                self.mark_pending(suite);
            }
            None => {
                for test in suite.tests() {
                    self.run_test(test);
                }
                for child in suite.suites() {
                    self.run_suite(child, false);
                }
            }
        }

        if let Some(outcome) = self.run_suite_hooks(suite, HookKind::After) {
            let title = self.full_title(HookKind::After.label());
            self.record(title, outcome);
        }

        self.path.pop();
    }

    fn mark_pending(&mut self, suite: &'s Suite) {
        for test in suite.tests() {
            let title = self.full_title(&test.meta.name);
            self.pending(title);
        }
        for child in suite.suites() {
            self.send(SuiteEvent::SuiteStart {
                title: child.title().to_string(),
                depth: self.path.len(),
            });
            self.path.push(child);
            self.mark_pending(child);
            self.path.pop();
        }
    }

    fn run_suite_hooks(&self, suite: &Suite, kind: HookKind) -> Option<TestOutcome> {
        let now = Instant::now();
        let failure = suite
            .hooks()
            .of(kind)
            .iter()
            .find_map(|hook| run_hook(kind, hook))?;
        Some(TestOutcome {
            status: TestStatus::Failed(failure),
            duration: now.elapsed(),
        })
    }

    fn run_test(&mut self, test: &Test) {
        let title = self.full_title(&test.meta.name);
        if test.meta.ignore.is_ignored() {
            self.pending(title);
            return;
        }

        let now = Instant::now();
        let before_failure = self
            .path
            .iter()
            .flat_map(|suite| suite.hooks().of(HookKind::BeforeEach))
            .find_map(|hook| run_hook(HookKind::BeforeEach, hook));

        let mut status = match before_failure {
            Some(failure) => TestStatus::Failed(failure),
            None => panic_handler::handle(|| test.call()),
        };

        for hook in self
            .path
            .iter()
            .rev()
            .flat_map(|suite| suite.hooks().of(HookKind::AfterEach))
        {
            let failure = run_hook(HookKind::AfterEach, hook);
            if let (Some(failure), true) = (failure, status.passed()) {
                status = TestStatus::Failed(failure);
            }
        }

        let outcome = TestOutcome {
            status,
            duration: now.elapsed(),
        };
        self.record(title, outcome);
    }
}

fn run_hook(kind: HookKind, hook: &TestFnHandle) -> Option<TestFailure> {
    match panic_handler::handle(|| hook.call()) {
        TestStatus::Failed(TestFailure::Error(message) | TestFailure::Panicked(message)) => {
            Some(TestFailure::Hook {
                hook: kind,
                message,
            })
        }
        _ => None,
    }
}
