//! The filter registry and the filter sets derived from it.
//!
//! A [`FilterRegistry`] is an ordered list of named predicates. It is plain
//! owned data: whoever sets up a test file owns it, mutates it and derives
//! [`FilterSet`]s from it via [`setup`](FilterRegistry::setup). A filter set
//! is a frozen snapshot, later registrations do not leak into sets that were
//! derived earlier.
//!
//! The order of the list is the order in which filters were first
//! registered. It is the order [`names`](FilterSet::names) reports and the
//! order a merge keeps.

use std::{borrow::Cow, collections::HashSet, sync::Arc};

use crate::{
    decision::FilterDecision, error::ConfigurationError, filterable::Filterable,
    predicate::FilterHandle,
};

/// Name of the built-in filter that excludes everything.
pub const IGNORE: &str = "ignore";

fn ignore() -> FilterDecision {
    FilterDecision::Exclude
}

type Entry = (Cow<'static, str>, FilterHandle);

/// How [`FilterRegistry::setup_with`] treats the filters it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupMode {
    /// Overlay the given filters onto the registry. Given filters win on a
    /// name collision.
    #[default]
    Merge,

    /// Use only the given filters, ignore the registry.
    Standalone,
}

/// Ordered mapping from filter name to predicate.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: Vec<Entry>,
    builtin: Arc<[Cow<'static, str>]>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRegistry {
    /// A registry holding only the built-in [`IGNORE`] filter.
    pub fn new() -> Self {
        let filters = builtin_filters();
        let builtin = filters.iter().map(|(name, _)| name.clone()).collect();
        Self { filters, builtin }
    }

    /// Replace the whole registry with `defaults`.
    ///
    /// Every name must be non-empty and unique, otherwise nothing changes
    /// and a [`ConfigurationError`] is returned. If `defaults` has no
    /// [`IGNORE`] entry, the built-in one is put in front.
    ///
    /// The names reserved by [`new`](Self::new) stay reserved, so
    /// [`add_filter`](Self::add_filter) still rejects them afterwards.
    pub fn initialize<I, N, P>(&mut self, defaults: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<Cow<'static, str>>,
        P: Into<FilterHandle>,
    {
        let mut seen = HashSet::new();
        let mut filters = Vec::new();
        for (name, predicate) in defaults {
            let name = name.into();
            if name.is_empty() {
                return Err(ConfigurationError::EmptyName);
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigurationError::DuplicateName(name));
            }
            filters.push((name, predicate.into()));
        }

        if !seen.contains(IGNORE) {
            filters.insert(0, (Cow::Borrowed(IGNORE), FilterHandle::from_const_fn(ignore)));
        }

        log::debug!("filter registry replaced, {} filters active", filters.len());
        self.filters = filters;
        Ok(())
    }

    /// Drop every registered filter and go back to the built-in ones.
    pub fn reset(&mut self) {
        log::debug!("filter registry reset to built-in filters");
        self.filters = builtin_filters();
    }

    /// Register a single filter.
    ///
    /// Returns `false` and leaves the registry untouched if `name` is one of
    /// the built-in names. Otherwise the filter is inserted, or replaces an
    /// earlier filter of the same name in place, and `true` is returned.
    pub fn add_filter(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        predicate: impl Into<FilterHandle>,
    ) -> bool {
        let name = name.into();
        if self.is_builtin(&name) {
            log::debug!("refusing to overwrite built-in filter `{name}`");
            return false;
        }

        log::debug!("registering filter `{name}`");
        upsert(&mut self.filters, name, predicate.into());
        true
    }

    /// Register every filter in `filters`, in order, via
    /// [`add_filter`](Self::add_filter).
    ///
    /// Entries with built-in names are rejected one by one, the rest are
    /// still registered.
    pub fn add_filters<I, N, P>(&mut self, filters: I)
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<Cow<'static, str>>,
        P: Into<FilterHandle>,
    {
        for (name, predicate) in filters {
            self.add_filter(name, predicate);
        }
    }

    /// Derive a [`FilterSet`] from the current registry.
    pub fn setup(&self) -> FilterSet {
        FilterSet::from_entries(self.filters.clone())
    }

    /// Derive a [`FilterSet`] from `filters`, combined with the registry as
    /// `mode` says.
    ///
    /// The registry itself is not changed, the combination only lives in the
    /// returned set.
    pub fn setup_with<I, N, P>(&self, filters: I, mode: SetupMode) -> FilterSet
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<Cow<'static, str>>,
        P: Into<FilterHandle>,
    {
        let mut entries = match mode {
            SetupMode::Merge => self.filters.clone(),
            SetupMode::Standalone => Vec::new(),
        };
        for (name, predicate) in filters {
            upsert(&mut entries, name.into(), predicate.into());
        }
        FilterSet::from_entries(entries)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtin.iter().any(|builtin| builtin == name)
    }

    pub fn get(&self, name: &str) -> Option<&FilterHandle> {
        self.filters
            .iter()
            .find_map(|(n, handle)| (n == name).then_some(handle))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.filters.iter().map(|(name, _)| name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

fn builtin_filters() -> Vec<Entry> {
    vec![(Cow::Borrowed(IGNORE), FilterHandle::from_const_fn(ignore))]
}

fn upsert(entries: &mut Vec<Entry>, name: Cow<'static, str>, predicate: FilterHandle) {
    match entries.iter_mut().find(|(n, _)| *n == name) {
        Some((_, slot)) => *slot = predicate,
        None => entries.push((name, predicate)),
    }
}

/// A frozen, ordered set of filters.
///
/// Obtained from [`FilterRegistry::setup`]. Cloning only bumps a reference
/// count.
#[derive(Debug, Clone)]
pub struct FilterSet {
    filters: Arc<[Entry]>,
}

impl FilterSet {
    fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            filters: entries.into(),
        }
    }

    /// Wrap any lifecycle function so it can be gated by this set.
    pub fn wrap<F>(&self, function: F) -> Filterable<F> {
        Filterable::new(function, self.clone())
    }

    pub fn get(&self, name: &str) -> Option<&FilterHandle> {
        self.filters
            .iter()
            .find_map(|(n, handle)| (n == name).then_some(handle))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.filters.iter().map(|(name, _)| name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
