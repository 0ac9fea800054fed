use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::ChangeKind;

/// What a diff does with what it finds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMode {
    /// Stream records to a sink as they are found.
    Emit,
    /// Return records to the caller.
    #[default]
    Collect,
    /// Graft what the first document lacks from the second into the first.
    MergeIntoFirst,
}

/// The set of change kinds that get reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultFilter(BTreeSet<ChangeKind>);

impl ResultFilter {
    /// Report every kind, including equal values.
    pub fn all() -> Self {
        Self(ChangeKind::ALL.into_iter().collect())
    }

    /// Report only the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = ChangeKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    pub fn contains(&self, kind: ChangeKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ChangeKind> + '_ {
        self.0.iter().copied()
    }
}

/// Every kind of actual difference; equal values are left out.
impl Default for ResultFilter {
    fn default() -> Self {
        Self::only([
            ChangeKind::MissingFromSecond,
            ChangeKind::MissingFromFirst,
            ChangeKind::Differs,
            ChangeKind::DepthTruncated,
        ])
    }
}

/// Configuration for a diff or merge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    pub mode: DiffMode,
    /// Deepest container level compared; 0 means unlimited.
    pub max_depth: usize,
    pub filter: ResultFilter,
}

impl DiffOptions {
    pub fn new(mode: DiffMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_filter(mut self, filter: ResultFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Whether containers at `depth` (the root is 0) are descended.
    pub fn descends(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth < self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_skips_equal() {
        let filter = ResultFilter::default();
        assert!(!filter.contains(ChangeKind::Equal));
        assert!(filter.contains(ChangeKind::Differs));
        assert!(ResultFilter::all().contains(ChangeKind::Equal));
    }

    #[test]
    fn zero_depth_is_unlimited() {
        let opts = DiffOptions::default();
        assert!(opts.descends(1_000));
        let opts = DiffOptions::default().with_max_depth(2);
        assert!(opts.descends(1));
        assert!(!opts.descends(2));
    }

    #[test]
    fn deserializes_partial_config() {
        let opts: DiffOptions =
            serde_json::from_str(r#"{"max_depth": 3, "filter": ["differs"]}"#).unwrap();
        assert_eq!(opts.mode, DiffMode::Collect);
        assert_eq!(opts.max_depth, 3);
        assert_eq!(opts.filter, ResultFilter::only([ChangeKind::Differs]));
    }
}
