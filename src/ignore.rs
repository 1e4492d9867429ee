/// Whether a declared test or suite runs or is reported as pending.
///
/// `it_skip` and `describe_skip` declare with [`Ignore`](Self::Ignore).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum IgnoreStatus {
    #[default]
    Run,
    Ignore,
}

impl IgnoreStatus {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignore)
    }
}
