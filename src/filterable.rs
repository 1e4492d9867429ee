//! Gating lifecycle functions behind named filters.
//!
//! A [`Filterable`] pairs a lifecycle function with a [`FilterSet`] and the
//! decision accumulated so far. [`with`](Filterable::with) evaluates one more
//! filter and folds its verdict in, [`call`](Filterable::call) finally hands
//! the arguments to the wrapped function, to its skip variant, or to nobody.
//!
//! ```
//! use testgate::{filterable::Plain, registry::FilterRegistry};
//!
//! let mut registry = FilterRegistry::new();
//! registry.add_filter("always", || true);
//! let filters = registry.setup();
//!
//! let mut seen = Vec::new();
//! filters
//!     .wrap(Plain(|n: u32| seen.push(n)))
//!     .with("always")
//!     .unwrap()
//!     .call(7);
//! assert_eq!(seen, [7]);
//! ```

use crate::{decision::FilterDecision, error::UnknownFilter, registry::FilterSet};

/// A function a [`Filterable`] can gate.
///
/// `Args` are the positional arguments, usually bundled in a tuple. The
/// same arguments go to [`call`](Self::call) and [`call_skip`](Self::call_skip).
pub trait LifecycleFn<Args>: Sized {
    /// Call the function normally.
    fn call(self, args: Args);

    /// Call the skip variant of the function.
    ///
    /// Functions without a skip variant keep the default, which drops the
    /// call.
    fn call_skip(self, _args: Args) {}

    fn has_skip(&self) -> bool {
        false
    }
}

/// Adapts a plain closure into a [`LifecycleFn`] without a skip variant.
#[derive(Debug, Clone, Copy)]
pub struct Plain<F>(pub F);

impl<Args, F> LifecycleFn<Args> for Plain<F>
where
    F: FnOnce(Args),
{
    fn call(self, args: Args) {
        (self.0)(args)
    }
}

/// Adapts a pair of closures into a [`LifecycleFn`] with a skip variant.
#[derive(Debug, Clone, Copy)]
pub struct Skippable<F, S> {
    pub call: F,
    pub skip: S,
}

impl<F, S> Skippable<F, S> {
    pub fn new(call: F, skip: S) -> Self {
        Self { call, skip }
    }
}

impl<Args, F, S> LifecycleFn<Args> for Skippable<F, S>
where
    F: FnOnce(Args),
    S: FnOnce(Args),
{
    fn call(self, args: Args) {
        (self.call)(args)
    }

    fn call_skip(self, args: Args) {
        (self.skip)(args)
    }

    fn has_skip(&self) -> bool {
        true
    }
}

/// What a [`Filterable::call`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The wrapped function ran.
    Called,

    /// The skip variant of the wrapped function ran.
    Skipped,

    /// Nothing ran.
    Omitted,
}

/// A lifecycle function gated by a chain of filters.
#[derive(Debug, Clone)]
pub struct Filterable<F> {
    function: F,
    filters: FilterSet,
    decision: FilterDecision,
}

impl<F> Filterable<F> {
    pub fn new(function: F, filters: FilterSet) -> Self {
        Self {
            function,
            filters,
            decision: FilterDecision::Run,
        }
    }

    /// Evaluate the filter `name` and fold its verdict into the chain.
    ///
    /// The predicate runs right away. Every filter is evaluated even after
    /// the chain got excluded, but an excluded chain stays excluded.
    pub fn with(self, name: &str) -> Result<Self, UnknownFilter> {
        let Some(filter) = self.filters.get(name) else {
            return Err(UnknownFilter {
                name: name.to_string(),
            });
        };

        let verdict = filter.decide();
        let decision = self.decision.and(verdict);
        log::trace!("filter `{name}` decided {verdict:?}, chain is now {decision:?}");
        Ok(Self { decision, ..self })
    }

    /// The verdict accumulated so far.
    pub fn decision(&self) -> FilterDecision {
        self.decision
    }

    /// The names of every filter this chain may continue with.
    pub fn filters(&self) -> impl ExactSizeIterator<Item = &str> {
        self.filters.names()
    }

    pub fn into_inner(self) -> F {
        self.function
    }
}

impl<F> Filterable<F> {
    /// Hand `args` to the wrapped function according to the chain's verdict.
    ///
    /// Without any filters applied this is the same as calling the wrapped
    /// function directly.
    pub fn call<Args>(self, args: Args) -> Dispatch
    where
        F: LifecycleFn<Args>,
    {
        match self.decision {
            FilterDecision::Run => {
                self.function.call(args);
                Dispatch::Called
            }
            FilterDecision::Skip if self.function.has_skip() => {
                self.function.call_skip(args);
                Dispatch::Skipped
            }
            FilterDecision::Skip => {
                log::debug!("skip requested but the wrapped function has no skip variant");
                Dispatch::Omitted
            }
            FilterDecision::Exclude => Dispatch::Omitted,
        }
    }

    /// Shorthand for `self.with(name)?.call(args)`.
    pub fn call_with<Args>(self, name: &str, args: Args) -> Result<Dispatch, UnknownFilter>
    where
        F: LifecycleFn<Args>,
    {
        Ok(self.with(name)?.call(args))
    }
}
