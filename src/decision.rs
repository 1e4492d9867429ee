/// The verdict of a single filter predicate.
///
/// `bool` converts into this, so plain `|| true` predicates work: `true` is
/// [`Run`](Self::Run) and `false` is [`Exclude`](Self::Exclude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterDecision {
    /// Run the wrapped function normally.
    #[default]
    Run,

    /// Route the call to the skip variant of the wrapped function, so the
    /// test or suite shows up as pending instead of vanishing.
    Skip,

    /// Do not call anything; the test or suite is silently not declared.
    Exclude,
}

impl FilterDecision {
    /// Fold another decision into this one.
    ///
    /// `Exclude` wins over `Skip`, which wins over `Run`. Once a chain got
    /// excluded, no later filter can bring it back.
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Exclude, _) | (_, Self::Exclude) => Self::Exclude,
            (Self::Skip, _) | (_, Self::Skip) => Self::Skip,
            (Self::Run, Self::Run) => Self::Run,
        }
    }

    pub const fn runs(self) -> bool {
        matches!(self, Self::Run)
    }

    pub const fn skips(self) -> bool {
        matches!(self, Self::Skip)
    }

    pub const fn excludes(self) -> bool {
        matches!(self, Self::Exclude)
    }
}

impl From<bool> for FilterDecision {
    fn from(value: bool) -> Self {
        match value {
            true => Self::Run,
            false => Self::Exclude,
        }
    }
}
