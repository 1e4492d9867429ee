use std::{
    cell::RefCell,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use pretty_assertions::assert_eq;
use testgate::{outcome::TestStatus, prelude::*};

fn counted(decision: FilterDecision) -> (Arc<AtomicUsize>, FilterHandle) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handle = FilterHandle::new({
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            decision
        }
    });
    (calls, handle)
}

fn declared(suite: &Suite) -> Vec<(String, bool)> {
    suite
        .tests()
        .iter()
        .map(|test| (test.meta.name.to_string(), test.meta.ignore.is_ignored()))
        .collect()
}

#[test]
fn all_passing_filters_behave_like_the_original() {
    let mut registry = FilterRegistry::new();
    registry.add_filters([
        ("a", FilterHandle::new(|| true)),
        ("b", FilterHandle::new(|| true)),
    ]);
    let filters = registry.setup();

    let mut plain = Suite::new("root");
    plain.it("case", || ());
    plain.describe("inner", |s: &mut Suite| s.it("nested", || ()));

    let mut gated = Suite::new("root");
    filters
        .it(&mut gated)
        .with("a")
        .and_then(|it| it.call_with("b", ("case", || ())))
        .unwrap();
    filters
        .describe(&mut gated)
        .with("b")
        .and_then(|describe| {
            describe.call_with(
                "a",
                ("inner", |s: &mut Suite| s.it("nested", || ())),
            )
        })
        .unwrap();

    assert_eq!(declared(&gated), declared(&plain));
    assert_eq!(declared(&gated.suites()[0]), declared(&plain.suites()[0]));

    let plain_report = testgate::harness(&plain).run();
    let gated_report = testgate::harness(&gated).run();
    let titles = |report: &testgate::SuiteReport<_>| -> Vec<String> {
        report.outcomes.iter().map(|(t, _)| t.clone()).collect()
    };
    assert_eq!(titles(&gated_report), titles(&plain_report));
}

#[test]
fn a_failing_filter_never_calls_the_original() {
    let mut registry = FilterRegistry::new();
    registry.add_filter("onlyCI", || false);
    let filters = registry.setup();

    let ran = Rc::new(RefCell::new(false));
    let mut root = Suite::new("root");
    let dispatch = filters
        .it(&mut root)
        .call_with(
            "onlyCI",
            ("test name", {
                let ran = Rc::clone(&ran);
                move || *ran.borrow_mut() = true
            }),
        )
        .unwrap();

    assert_eq!(dispatch, Dispatch::Omitted);
    assert!(root.tests().is_empty());

    let report = testgate::harness(&root).run();
    assert!(report.outcomes.is_empty());
    assert!(!*ran.borrow());
}

#[test]
fn skip_marker_calls_the_skip_variant_with_the_same_arguments() {
    let mut registry = FilterRegistry::new();
    registry.add_filter("flaky", || FilterDecision::Skip);
    let filters = registry.setup();

    let calls = Rc::new(RefCell::new(Vec::new()));
    let it = Skippable::new(
        {
            let calls = Rc::clone(&calls);
            move |(name, _body): (&str, fn())| calls.borrow_mut().push(("it", name.to_string()))
        },
        {
            let calls = Rc::clone(&calls);
            move |(name, _body): (&str, fn())| {
                calls.borrow_mut().push(("it.skip", name.to_string()))
            }
        },
    );

    fn callback() {}
    let dispatch = filters
        .wrap(it)
        .call_with("flaky", ("test name", callback as fn()))
        .unwrap();

    assert_eq!(dispatch, Dispatch::Skipped);
    assert_eq!(*calls.borrow(), [("it.skip", "test name".to_string())]);

    let mut root = Suite::new("root");
    filters
        .it(&mut root)
        .call_with("flaky", ("test name", callback))
        .unwrap();
    assert_eq!(declared(&root), [("test name".to_string(), true)]);

    let report = testgate::harness(&root).run();
    assert!(report.get("root test name").unwrap().status.ignored());
}

#[test]
fn earlier_failure_wins_over_later_skip() {
    let mut registry = FilterRegistry::new();
    registry.add_filter("off", || false);
    registry.add_filter("flaky", || FilterDecision::Skip);
    let filters = registry.setup();

    let mut root = Suite::new("root");
    let dispatch = filters
        .it(&mut root)
        .with("off")
        .and_then(|it| it.call_with("flaky", ("test name", || ())))
        .unwrap();

    assert_eq!(dispatch, Dispatch::Omitted);
    assert!(root.tests().is_empty());
}

#[test]
fn ignore_cannot_be_replaced() {
    let mut registry = FilterRegistry::new();
    assert!(!registry.add_filter("ignore", || true));
    registry.add_filters([("ignore", FilterHandle::new(|| true))]);
    registry
        .initialize([("other", FilterHandle::new(|| true))])
        .unwrap();
    assert!(!registry.add_filter("ignore", || true));

    let mut root = Suite::new("root");
    let dispatch = registry
        .setup()
        .it(&mut root)
        .call_with("ignore", ("test name", || ()))
        .unwrap();
    assert_eq!(dispatch, Dispatch::Omitted);
    assert!(root.tests().is_empty());
}

#[test]
fn added_filter_is_asked_once_per_invocation() {
    let (calls, predicate) = counted(FilterDecision::Run);
    let mut registry = FilterRegistry::new();
    assert!(registry.add_filter("customA", predicate));
    let filters = registry.setup();

    let mut root = Suite::new("root");
    for name in ["one", "two"] {
        filters
            .it(&mut root)
            .call_with("customA", (name, || ()))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), root.tests().len());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn initialize_with_nothing_leaves_only_ignore() {
    let mut registry = FilterRegistry::new();
    registry.add_filter("gone", || true);
    registry
        .initialize(Vec::<(&'static str, FilterHandle)>::new())
        .unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), ["ignore"]);
}

#[test]
fn initialize_rejects_duplicate_names() {
    let mut registry = FilterRegistry::new();
    let err = registry
        .initialize([
            ("ci", FilterHandle::new(|| true)),
            ("ci", FilterHandle::new(|| false)),
        ])
        .unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicateName("ci".into()));
    assert!(err.to_string().starts_with("default filters should be a mapping"));
}

#[test]
fn add_filters_registers_every_entry() {
    let mut registry = FilterRegistry::new();
    registry.add_filters([
        ("a", FilterHandle::new(|| true)),
        ("b", FilterHandle::new(|| true)),
        ("c", FilterHandle::new(|| true)),
    ]);

    let filters = registry.setup();
    let mut root = Suite::new("root");
    for name in ["a", "b", "c"] {
        filters
            .it(&mut root)
            .call_with(name, (name, || ()))
            .unwrap();
    }
    assert_eq!(root.tests().len(), 3);
}

#[test]
fn unknown_filters_are_reported() {
    let filters = FilterRegistry::new().setup();
    let mut root = Suite::new("root");
    let err = filters
        .it(&mut root)
        .call_with("typo", ("test name", || ()))
        .unwrap_err();
    assert_eq!(err.name, "typo");
    assert!(root.tests().is_empty());
}

#[test]
fn per_call_overlay_does_not_touch_the_registry() {
    let mut registry = FilterRegistry::new();
    registry.add_filter("ci", || true);

    let overlay = registry.setup_with([("ci", FilterHandle::new(|| false))], SetupMode::Merge);
    let mut root = Suite::new("root");
    overlay
        .it(&mut root)
        .call_with("ci", ("overlaid", || ()))
        .unwrap();
    registry
        .setup()
        .it(&mut root)
        .call_with("ci", ("registry", || ()))
        .unwrap();

    assert_eq!(declared(&root), [("registry".to_string(), false)]);
}

#[test]
fn gated_suite_runs_end_to_end() {
    let mut registry = FilterRegistry::new();
    registry.add_filters([
        ("onlyCI", FilterHandle::new(|| false)),
        ("flaky", FilterHandle::new(|| FilterDecision::Skip)),
        ("local", FilterHandle::new(|| true)),
    ]);
    let filters = registry.setup();

    let mut root = Suite::new("");
    filters
        .describe(&mut root)
        .call_with(
            "local",
            ("db", |s: &mut Suite| {
                filters.before(s).call_with("local", || ()).unwrap();
                filters.it(s).call(("connects", || ()));
                filters
                    .it(s)
                    .call_with("flaky", ("reconnects", || ()))
                    .unwrap();
                filters
                    .it(s)
                    .call_with("onlyCI", ("migrates prod", || ()))
                    .unwrap();
                filters
                    .it(s)
                    .call(("fails", || Err::<(), _>("constraint violated")));
            }),
        )
        .unwrap();

    let report = testgate::harness(&root).with_reporter(LogReporter).run();
    let statuses: Vec<_> = report
        .outcomes
        .iter()
        .map(|(title, outcome)| {
            let status = match outcome.status {
                TestStatus::Passed => "passed",
                TestStatus::Ignored => "pending",
                TestStatus::Failed(_) => "failed",
                _ => "other",
            };
            (title.as_str(), status)
        })
        .collect();

    assert_eq!(
        statuses,
        [
            ("db connects", "passed"),
            ("db reconnects", "pending"),
            ("db fails", "failed"),
        ]
    );
    assert_eq!((report.passed(), report.failed(), report.ignored()), (1, 1, 1));
    assert!(!report.is_good());
}
