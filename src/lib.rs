//! Named filter predicates that gate suites, tests and hooks before they run.
//!
//! Register predicates in a [`FilterRegistry`](registry::FilterRegistry),
//! derive a [`FilterSet`](registry::FilterSet) from it, and declare tests
//! through the set. Each declaration passes through the filters named on it
//! first: passing filters declare normally, a filter answering
//! [`Skip`](decision::FilterDecision::Skip) declares a pending test or suite,
//! and a filter answering `false` declares nothing at all.
//!
//! ```
//! use testgate::prelude::*;
//!
//! let mut registry = FilterRegistry::new();
//! registry.add_filter("onlyCI", || std::env::var_os("CI").is_some());
//! let filters = registry.setup();
//!
//! let mut root = Suite::new("math");
//! filters.it(&mut root).call(("adds", || assert_eq!(2 + 2, 4)));
//! filters
//!     .it(&mut root)
//!     .call_with("ignore", ("never declared", || ()))
//!     .unwrap();
//!
//! let report = testgate::harness(&root).run();
//! assert_eq!(report.outcomes.len(), 1);
//! assert!(report.is_good());
//! ```

pub mod decision;
pub mod error;
pub mod filterable;
pub mod ignore;
pub mod outcome;
pub mod predicate;
pub mod registry;
pub mod reporter;
pub mod suite;

mod panic_handler;

mod report;
pub use report::*;

pub use suite::{SuiteHarness, harness};

#[cfg(test)]
mod test_support;

pub mod prelude {
    pub use crate::{
        decision::FilterDecision,
        error::{ConfigurationError, UnknownFilter},
        filterable::{Dispatch, Filterable, LifecycleFn, Plain, Skippable},
        predicate::FilterHandle,
        registry::{FilterRegistry, FilterSet, SetupMode},
        reporter::{LogReporter, NoReporter, PlainReporter, SuiteReporter},
        suite::Suite,
    };
}
