use std::{fmt::Debug, sync::Arc};

use crate::decision::FilterDecision;

/// Something that can decide whether a wrapped function may run.
///
/// Implemented for every `Fn() -> T` where `T` converts into a
/// [`FilterDecision`], so both `|| false` and `|| FilterDecision::Skip` are
/// valid predicates.
pub trait FilterFn {
    fn decide(&self) -> FilterDecision;
}

impl<F, T> FilterFn for F
where
    F: Fn() -> T,
    T: Into<FilterDecision>,
{
    fn decide(&self) -> FilterDecision {
        (self)().into()
    }
}

/// A cheaply clonable handle to a filter predicate.
#[derive(Clone)]
#[non_exhaustive]
pub enum FilterHandle {
    Ptr(fn() -> FilterDecision),
    Shared(Arc<dyn FilterFn + Send + Sync>),
}

impl Debug for FilterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ptr(ptr) => f.debug_tuple("Ptr").field(ptr).finish(),
            Self::Shared(_) => write!(f, "Shared(...)"),
        }
    }
}

impl FilterHandle {
    pub const fn from_const_fn(f: fn() -> FilterDecision) -> Self {
        Self::Ptr(f)
    }

    pub fn new<F, T>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<FilterDecision>,
    {
        Self::Shared(Arc::new(f))
    }

    /// Evaluate the predicate.
    ///
    /// A panicking predicate is not caught here, the panic travels up to
    /// whoever called the wrapped function.
    pub fn decide(&self) -> FilterDecision {
        match self {
            Self::Ptr(f) => f(),
            Self::Shared(f) => f.decide(),
        }
    }
}

impl<F, T> From<F> for FilterHandle
where
    F: Fn() -> T + Send + Sync + 'static,
    T: Into<FilterDecision>,
{
    fn from(value: F) -> Self {
        FilterHandle::new(value)
    }
}
