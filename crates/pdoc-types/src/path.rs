//! Addressing into nested documents.
//!
//! A [`Path`] is a sequence of [`Step`]s: string keys select dict entries,
//! integer indices select array elements. Paths display as
//! `/{key}/[index]/...`, with `/` alone for the document root.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// One step of a path: a dict key or an array index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl Step {
    /// Parse the command-line spelling of a step: `[N]` is an index,
    /// anything else is a key.
    pub fn parse(text: &str) -> Self {
        text.strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|digits| digits.trim().parse::<usize>().ok())
            .map(Self::Index)
            .unwrap_or_else(|| Self::Key(text.to_string()))
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(_) => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{{{key}}}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A location in a document, as the steps taken from its root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Step>);

impl Path {
    /// The empty path, addressing the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, step: impl Into<Step>) {
        self.0.push(step.into());
    }

    pub fn pop(&mut self) -> Option<Step> {
        self.0.pop()
    }

    /// A new path extended by one step.
    pub fn join(&self, step: impl Into<Step>) -> Self {
        let mut steps = self.0.clone();
        steps.push(step.into());
        Self(steps)
    }

    /// Split into the parent path and the final step.
    pub fn split_last(&self) -> Option<(Path, &Step)> {
        self.0
            .split_last()
            .map(|(last, parent)| (Path(parent.to_vec()), last))
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.0
    }
}

impl Deref for Path {
    type Target = [Step];

    fn deref(&self) -> &[Step] {
        &self.0
    }
}

impl From<Vec<Step>> for Path {
    fn from(steps: Vec<Step>) -> Self {
        Self(steps)
    }
}

impl From<&[Step]> for Path {
    fn from(steps: &[Step]) -> Self {
        Self(steps.to_vec())
    }
}

impl FromIterator<Step> for Path {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

/// Build a [`Path`] from keys and indices.
///
/// ```
/// use pdoc_types::{path, Step};
///
/// let p = path!["items", 0usize, "name"];
/// assert_eq!(p.steps()[1], Step::Index(0));
/// assert_eq!(p.to_string(), "/{items}/[0]/{name}");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($step:expr),+ $(,)?) => {
        $crate::Path::from(vec![$($crate::Step::from($step)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_displays_as_slash() {
        assert_eq!(Path::root().to_string(), "/");
        assert!(Path::root().is_root());
    }

    #[test]
    fn display_marks_keys_and_indices() {
        let p = path!["a", 2usize, "b"];
        assert_eq!(p.to_string(), "/{a}/[2]/{b}");
    }

    #[test]
    fn parse_cli_steps() {
        assert_eq!(Step::parse("[3]"), Step::Index(3));
        assert_eq!(Step::parse("name"), Step::Key("name".into()));
        assert_eq!(Step::parse("3"), Step::Key("3".into()));
        assert_eq!(Step::parse("[x]"), Step::Key("[x]".into()));
    }

    #[test]
    fn join_and_split_last() {
        let p = Path::root().join("a").join(1usize);
        let (parent, last) = p.split_last().unwrap();
        assert_eq!(parent, path!["a"]);
        assert_eq!(*last, Step::Index(1));
        assert!(Path::root().split_last().is_none());
    }

    #[test]
    fn serde_as_plain_sequence() {
        let p = path![0usize, "k"];
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"[0,"k"]"#);
        let back: Path = serde_json::from_str(r#"[0,"k"]"#).unwrap();
        assert_eq!(back, p);
    }
}
