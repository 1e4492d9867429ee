use std::borrow::Cow;

/// Rejected input to [`FilterRegistry::initialize`](crate::registry::FilterRegistry::initialize).
///
/// The default filters have to form a mapping: every name non-empty and
/// present at most once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("default filters should be a mapping, but `{0}` appears more than once")]
    DuplicateName(Cow<'static, str>),

    #[error("default filters should be a mapping, but one filter has an empty name")]
    EmptyName,
}

/// A chain referenced a filter the [`FilterSet`](crate::registry::FilterSet)
/// does not know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter `{name}`")]
pub struct UnknownFilter {
    pub name: String,
}
