//! The declaration side of a test run.
//!
//! A [`Suite`] is a tree in the shape mocha users know: `describe` opens a
//! nested suite, `it` declares a test, and `before`, `after`, `before_each`
//! and `after_each` attach hooks. `describe_skip` and `it_skip` declare
//! pending suites and tests.
//!
//! Each of the six declaration functions is also available as a
//! [`LifecycleFn`] handle ([`Describe`], [`It`], [`Before`], [`After`],
//! [`BeforeEach`], [`AfterEach`]), which is what a [`FilterSet`] wraps to
//! gate declarations behind filters:
//!
//! ```
//! use testgate::{decision::FilterDecision, registry::FilterRegistry, suite::Suite};
//!
//! let mut registry = FilterRegistry::new();
//! registry.add_filter("onlyCI", || false);
//! registry.add_filter("flaky", || FilterDecision::Skip);
//! let filters = registry.setup();
//!
//! let mut suite = Suite::new("db");
//! filters.it(&mut suite).call_with("onlyCI", ("migrates", || ())).unwrap();
//! filters.it(&mut suite).call_with("flaky", ("reconnects", || ())).unwrap();
//!
//! assert_eq!(suite.tests().len(), 1);
//! assert!(suite.tests()[0].meta.ignore.is_ignored());
//! ```

use std::borrow::Cow;

use crate::{
    filterable::{Filterable, LifecycleFn},
    ignore::IgnoreStatus,
    outcome::HookKind,
    registry::FilterSet,
    test::{Test, TestFnHandle, TestMeta, TestResult},
};

mod run;
pub use run::*;

/// A named group of tests, hooks and nested suites.
#[derive(Debug, Default)]
pub struct Suite {
    title: Cow<'static, str>,
    ignore: IgnoreStatus,
    tests: Vec<Test>,
    suites: Vec<Suite>,
    hooks: SuiteHooks,
}

#[derive(Debug, Default)]
pub(crate) struct SuiteHooks {
    pub before: Vec<TestFnHandle>,
    pub after: Vec<TestFnHandle>,
    pub before_each: Vec<TestFnHandle>,
    pub after_each: Vec<TestFnHandle>,
}

impl SuiteHooks {
    pub(crate) fn of(&self, kind: HookKind) -> &[TestFnHandle] {
        match kind {
            HookKind::Before => &self.before,
            HookKind::After => &self.after,
            HookKind::BeforeEach => &self.before_each,
            HookKind::AfterEach => &self.after_each,
        }
    }

    fn of_mut(&mut self, kind: HookKind) -> &mut Vec<TestFnHandle> {
        match kind {
            HookKind::Before => &mut self.before,
            HookKind::After => &mut self.after,
            HookKind::BeforeEach => &mut self.before_each,
            HookKind::AfterEach => &mut self.after_each,
        }
    }
}

impl Suite {
    pub fn new(title: impl Into<Cow<'static, str>>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_ref()
    }

    pub fn ignore(&self) -> &IgnoreStatus {
        &self.ignore
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub(crate) fn hooks(&self) -> &SuiteHooks {
        &self.hooks
    }

    /// The number of tests in this suite and every nested suite.
    pub fn test_count(&self) -> usize {
        self.tests.len() + self.suites.iter().map(Suite::test_count).sum::<usize>()
    }

    pub fn hook_count(&self, kind: HookKind) -> usize {
        self.hooks.of(kind).len()
    }

    /// Declare a nested suite, filled in by `body`.
    pub fn describe<B>(&mut self, title: impl Into<Cow<'static, str>>, body: B)
    where
        B: FnOnce(&mut Suite),
    {
        self.push_suite(title.into(), IgnoreStatus::Run, body);
    }

    /// Declare a nested suite whose tests are all reported as pending.
    pub fn describe_skip<B>(&mut self, title: impl Into<Cow<'static, str>>, body: B)
    where
        B: FnOnce(&mut Suite),
    {
        self.push_suite(title.into(), IgnoreStatus::Ignore, body);
    }

    fn push_suite<B>(&mut self, title: Cow<'static, str>, ignore: IgnoreStatus, body: B)
    where
        B: FnOnce(&mut Suite),
    {
        let mut suite = Suite {
            title,
            ignore,
            ..Default::default()
        };
        body(&mut suite);
        log::trace!("declared suite `{}` in `{}`", suite.title, self.title);
        self.suites.push(suite);
    }

    /// Declare a test.
    pub fn it<F, T>(&mut self, title: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.push_test(title.into(), IgnoreStatus::Run, f);
    }

    /// Declare a pending test, its body never runs.
    pub fn it_skip<F, T>(&mut self, title: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.push_test(title.into(), IgnoreStatus::Ignore, f);
    }

    fn push_test<F, T>(&mut self, name: Cow<'static, str>, ignore: IgnoreStatus, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        log::trace!("declared test `{name}` in `{}`", self.title);
        self.tests.push(Test::new(
            TestFnHandle::from_boxed(f),
            TestMeta { name, ignore },
        ));
    }

    /// Run `f` once before the first test of this suite.
    pub fn before<F, T>(&mut self, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.push_hook(HookKind::Before, f);
    }

    /// Run `f` once after everything in this suite.
    pub fn after<F, T>(&mut self, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.push_hook(HookKind::After, f);
    }

    /// Run `f` before every test in this suite and its nested suites.
    pub fn before_each<F, T>(&mut self, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.push_hook(HookKind::BeforeEach, f);
    }

    /// Run `f` after every test in this suite and its nested suites.
    pub fn after_each<F, T>(&mut self, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.push_hook(HookKind::AfterEach, f);
    }

    fn push_hook<F, T>(&mut self, kind: HookKind, f: F)
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.hooks.of_mut(kind).push(TestFnHandle::from_boxed(f));
    }
}

/// `describe` as a [`LifecycleFn`], with `describe_skip` as skip variant.
#[derive(Debug)]
pub struct Describe<'s>(pub &'s mut Suite);

/// `it` as a [`LifecycleFn`], with `it_skip` as skip variant.
#[derive(Debug)]
pub struct It<'s>(pub &'s mut Suite);

/// `before` as a [`LifecycleFn`].
#[derive(Debug)]
pub struct Before<'s>(pub &'s mut Suite);

/// `after` as a [`LifecycleFn`].
#[derive(Debug)]
pub struct After<'s>(pub &'s mut Suite);

/// `before_each` as a [`LifecycleFn`].
#[derive(Debug)]
pub struct BeforeEach<'s>(pub &'s mut Suite);

/// `after_each` as a [`LifecycleFn`].
#[derive(Debug)]
pub struct AfterEach<'s>(pub &'s mut Suite);

impl<N, B> LifecycleFn<(N, B)> for Describe<'_>
where
    N: Into<Cow<'static, str>>,
    B: FnOnce(&mut Suite),
{
    fn call(self, (title, body): (N, B)) {
        self.0.describe(title, body)
    }

    fn call_skip(self, (title, body): (N, B)) {
        self.0.describe_skip(title, body)
    }

    fn has_skip(&self) -> bool {
        true
    }
}

impl<N, F, T> LifecycleFn<(N, F)> for It<'_>
where
    N: Into<Cow<'static, str>>,
    F: Fn() -> T + 'static,
    T: Into<TestResult>,
{
    fn call(self, (title, f): (N, F)) {
        self.0.it(title, f)
    }

    fn call_skip(self, (title, f): (N, F)) {
        self.0.it_skip(title, f)
    }

    fn has_skip(&self) -> bool {
        true
    }
}

macro_rules! impl_hook_lifecycle {
    [$($name:ident => $method:ident),* $(,)?] => {$(
        impl<F, T> LifecycleFn<F> for $name<'_>
        where
            F: Fn() -> T + 'static,
            T: Into<TestResult>,
        {
            fn call(self, f: F) {
                self.0.$method(f)
            }
        }
    )*};
}

impl_hook_lifecycle![
    Before => before,
    After => after,
    BeforeEach => before_each,
    AfterEach => after_each,
];

impl FilterSet {
    /// `describe` on `suite`, gated by this set.
    pub fn describe<'s>(&self, suite: &'s mut Suite) -> Filterable<Describe<'s>> {
        self.wrap(Describe(suite))
    }

    /// `it` on `suite`, gated by this set.
    pub fn it<'s>(&self, suite: &'s mut Suite) -> Filterable<It<'s>> {
        self.wrap(It(suite))
    }

    /// `before` on `suite`, gated by this set.
    pub fn before<'s>(&self, suite: &'s mut Suite) -> Filterable<Before<'s>> {
        self.wrap(Before(suite))
    }

    /// `after` on `suite`, gated by this set.
    pub fn after<'s>(&self, suite: &'s mut Suite) -> Filterable<After<'s>> {
        self.wrap(After(suite))
    }

    /// `before_each` on `suite`, gated by this set.
    pub fn before_each<'s>(&self, suite: &'s mut Suite) -> Filterable<BeforeEach<'s>> {
        self.wrap(BeforeEach(suite))
    }

    /// `after_each` on `suite`, gated by this set.
    pub fn after_each<'s>(&self, suite: &'s mut Suite) -> Filterable<AfterEach<'s>> {
        self.wrap(AfterEach(suite))
    }
}
