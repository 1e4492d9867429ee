use std::{
    cell::RefCell,
    convert::Infallible,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    decision::FilterDecision,
    predicate::FilterHandle,
    reporter::{SuiteEvent, SuiteReporter},
};

/// Collects labels in call order, to check what ran and when.
#[derive(Debug, Default, Clone)]
pub struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    pub fn take(&self) -> Vec<String> {
        self.0.take()
    }

    /// A function that records whatever it is called with.
    pub fn push_fn(&self) -> impl FnOnce(&'static str) + use<> {
        let inner = Rc::clone(&self.0);
        move |label| inner.borrow_mut().push(label.to_string())
    }

    pub fn push_prefixed_fn(&self, prefix: &'static str) -> impl FnOnce(&'static str) + use<> {
        let inner = Rc::clone(&self.0);
        move |label| inner.borrow_mut().push(format!("{prefix}{label}"))
    }

    /// A test or hook body that records `label` every time it runs.
    pub fn push_hook(&self, label: &'static str) -> impl Fn() + use<> {
        let inner = Rc::clone(&self.0);
        move || inner.borrow_mut().push(label.to_string())
    }
}

#[derive(Debug, Default, Clone)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A predicate answering `decision` that counts how often it was asked.
pub fn counting(decision: FilterDecision) -> (Counter, FilterHandle) {
    let counter = Counter::default();
    let calls = Arc::clone(&counter.0);
    let handle = FilterHandle::new(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        decision
    });
    (counter, handle)
}

/// A test or hook body that panics with `msg`.
pub fn panicking(msg: &'static str) -> impl Fn() + use<> {
    move || panic!("{msg}")
}

pub fn event_kind(event: &SuiteEvent) -> &'static str {
    match event {
        SuiteEvent::RunStart { .. } => "run start",
        SuiteEvent::SuiteStart { .. } => "suite start",
        SuiteEvent::TestPending { .. } => "pending",
        SuiteEvent::TestOutcome { .. } => "outcome",
        SuiteEvent::RunEnd(_) => "run end",
    }
}

/// Keeps a copy of every event.
pub struct EventLog<'e>(pub &'e mut Vec<SuiteEvent>);

impl SuiteReporter for EventLog<'_> {
    type Error = Infallible;

    fn report(&mut self, event: &SuiteEvent) -> Result<(), Self::Error> {
        self.0.push(event.clone());
        Ok(())
    }
}

/// Fails on every event.
pub struct BrokenReporter;

impl SuiteReporter for BrokenReporter {
    type Error = &'static str;

    fn report(&mut self, _: &SuiteEvent) -> Result<(), Self::Error> {
        Err("broken pipe")
    }
}
