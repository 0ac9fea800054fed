use std::fmt;
use std::str::FromStr;

use pdoc_types::Path;
use serde::{Deserialize, Serialize};

/// Classification of a single diff record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// Present in the first document only.
    MissingFromSecond,
    /// Present in the second document only.
    MissingFromFirst,
    /// Present in both with different values or kinds.
    Differs,
    /// Present in both with the same rendered value.
    Equal,
    /// A container pair below the depth limit, not compared.
    DepthTruncated,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 5] = [
        Self::MissingFromSecond,
        Self::MissingFromFirst,
        Self::Differs,
        Self::Equal,
        Self::DepthTruncated,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingFromSecond => "missing-from-second",
            Self::MissingFromFirst => "missing-from-first",
            Self::Differs => "differs",
            Self::Equal => "equal",
            Self::DepthTruncated => "depth-truncated",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown change kind: {s}"))
    }
}

/// One difference found between two documents.
///
/// `first` and `second` carry the rendered value on each side when that
/// side has one; containers render as their type name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub kind: ChangeKind,
    pub path: Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
}

impl DiffRecord {
    pub fn missing_from_second(path: Path, first: String) -> Self {
        Self {
            kind: ChangeKind::MissingFromSecond,
            path,
            first: Some(first),
            second: None,
        }
    }

    pub fn missing_from_first(path: Path, second: String) -> Self {
        Self {
            kind: ChangeKind::MissingFromFirst,
            path,
            first: None,
            second: Some(second),
        }
    }

    pub fn differs(path: Path, first: String, second: String) -> Self {
        Self {
            kind: ChangeKind::Differs,
            path,
            first: Some(first),
            second: Some(second),
        }
    }

    pub fn equal(path: Path, rendered: String) -> Self {
        Self {
            kind: ChangeKind::Equal,
            path,
            first: Some(rendered.clone()),
            second: Some(rendered),
        }
    }

    /// `kind` is the type name of the container that was not descended.
    pub fn depth_truncated(path: Path, kind: String) -> Self {
        Self {
            kind: ChangeKind::DepthTruncated,
            path,
            first: Some(kind),
            second: None,
        }
    }
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.first.as_deref().unwrap_or("");
        let second = self.second.as_deref().unwrap_or("");
        match self.kind {
            ChangeKind::MissingFromSecond => write!(f, "{} {}: {}", self.kind, self.path, first),
            ChangeKind::MissingFromFirst => write!(f, "{} {}: {}", self.kind, self.path, second),
            ChangeKind::Differs => write!(f, "{} {}: {} != {}", self.kind, self.path, first, second),
            ChangeKind::Equal => write!(f, "{} {}: {}", self.kind, self.path, first),
            ChangeKind::DepthTruncated => write!(f, "{} {} ({})", self.kind, self.path, first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdoc_types::path;

    #[test]
    fn kind_names_parse_back() {
        for kind in ChangeKind::ALL {
            assert_eq!(kind.name().parse::<ChangeKind>().unwrap(), kind);
        }
        assert!("added".parse::<ChangeKind>().is_err());
    }

    #[test]
    fn display_formats() {
        let r = DiffRecord::differs(path!["x"], "1".into(), "2".into());
        assert_eq!(r.to_string(), "differs /{x}: 1 != 2");
        let r = DiffRecord::missing_from_first(path!["y"], "2".into());
        assert_eq!(r.to_string(), "missing-from-first /{y}: 2");
        let r = DiffRecord::depth_truncated(path!["deep"], "dict".into());
        assert_eq!(r.to_string(), "depth-truncated /{deep} (dict)");
    }

    #[test]
    fn serializes_without_absent_sides() {
        let r = DiffRecord::missing_from_first(path!["y"], "2".into());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "missing-from-first", "path": ["y"], "second": "2"})
        );
    }
}
