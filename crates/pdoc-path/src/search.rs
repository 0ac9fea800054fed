//! Pattern-based multi-path search.
//!
//! A search is a list of [`Selector`]s consumed one per nesting level.
//! Arrays are matched by index selectors, dicts by a regular expression
//! over their keys, and a scalar reached with one selector left is matched
//! by that expression against its rendered text. Every path along which
//! all selectors were consumed is reported, in traversal order.

use pdoc_types::{Path, Value};
use regex::Regex;
use tracing::debug;

use crate::error::{PathError, PathResult};

/// One level of a multi-path search.
#[derive(Clone, Debug)]
pub enum Selector {
    /// A single array index.
    Index(usize),
    /// Several array indices, visited in the given order.
    Indices(Vec<usize>),
    /// Every index of an array, ascending.
    AllIndices,
    /// A regular expression over dict keys or rendered scalar text.
    Pattern(Regex),
}

impl Selector {
    /// Compile a pattern selector.
    pub fn pattern(pattern: &str) -> PathResult<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| PathError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Parse the command-line spelling of a selector: `*` for every index,
    /// `[N]` or `[N,M,...]` for indices, anything else as a pattern.
    pub fn parse(text: &str) -> PathResult<Self> {
        if text == "*" {
            return Ok(Self::AllIndices);
        }
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            let parsed: Result<Vec<usize>, _> =
                inner.split(',').map(|part| part.trim().parse::<usize>()).collect();
            if let Ok(mut indices) = parsed {
                return Ok(if indices.len() == 1 {
                    Self::Index(indices.remove(0))
                } else {
                    Self::Indices(indices)
                });
            }
        }
        Self::pattern(text)
    }

    fn indices(&self, len: usize) -> Vec<usize> {
        match self {
            Self::Index(index) => vec![*index],
            Self::Indices(indices) => indices.clone(),
            Self::AllIndices => (0..len).collect(),
            Self::Pattern(_) => Vec::new(),
        }
    }

    /// An empty pattern never matches, so a blank selector cannot turn
    /// into a blanket match.
    fn matches_text(&self, text: &str) -> bool {
        match self {
            Self::Pattern(re) => !re.as_str().is_empty() && re.is_match(text),
            _ => false,
        }
    }
}

/// Find every path in `root` matched by `selectors`.
///
/// An empty selector list matches nothing.
pub fn find_paths(root: &Value, selectors: &[Selector]) -> Vec<Path> {
    let mut results = Vec::new();
    if !selectors.is_empty() {
        let mut current = Path::root();
        search(root, selectors, &mut current, &mut results);
    }
    debug!(matches = results.len(), "path search complete");
    results
}

fn search(node: &Value, selectors: &[Selector], current: &mut Path, results: &mut Vec<Path>) {
    let Some((selector, rest)) = selectors.split_first() else {
        return;
    };

    match node {
        Value::Array(items) => {
            for index in selector.indices(items.len()) {
                let Some(item) = items.get(index) else {
                    continue;
                };
                current.push(index);
                descend(item, rest, current, results);
                current.pop();
            }
        }
        Value::Dict(map) => {
            for (key, child) in map {
                if !selector.matches_text(key) {
                    continue;
                }
                current.push(key.as_str());
                descend(child, rest, current, results);
                current.pop();
            }
        }
        scalar => {
            if rest.is_empty() && selector.matches_text(&scalar.render()) {
                results.push(current.clone());
            }
        }
    }
}

fn descend(child: &Value, rest: &[Selector], current: &mut Path, results: &mut Vec<Path>) {
    if rest.is_empty() {
        results.push(current.clone());
    } else {
        search(child, rest, current, results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdoc_types::path;

    fn items() -> Value {
        Value::Array(vec![
            [("k", Value::from("x"))].into_iter().collect(),
            [("k", Value::from("y"))].into_iter().collect(),
        ])
    }

    fn sel(text: &str) -> Selector {
        Selector::parse(text).unwrap()
    }

    #[test]
    fn wildcard_then_key_pattern() {
        let found = find_paths(&items(), &[Selector::AllIndices, sel("^k$")]);
        assert_eq!(found, vec![path![0usize, "k"], path![1usize, "k"]]);
    }

    #[test]
    fn terminal_pattern_filters_on_value() {
        let found = find_paths(&items(), &[sel("*"), sel("^k$"), sel("^y$")]);
        assert_eq!(found, vec![path![1usize, "k"]]);
    }

    #[test]
    fn index_lists_follow_given_order_and_skip_missing() {
        let found = find_paths(&items(), &[sel("[1,0,7]"), sel("k")]);
        assert_eq!(found, vec![path![1usize, "k"], path![0usize, "k"]]);
    }

    #[test]
    fn single_index_selector() {
        assert!(matches!(sel("[1]"), Selector::Index(1)));
        let found = find_paths(&items(), &[sel("[1]")]);
        assert_eq!(found, vec![path![1usize]]);
    }

    #[test]
    fn empty_pattern_never_matches() {
        let found = find_paths(&items(), &[sel("*"), sel("")]);
        assert!(found.is_empty());
    }

    #[test]
    fn no_selectors_match_nothing() {
        assert!(find_paths(&items(), &[]).is_empty());
    }

    #[test]
    fn pattern_against_array_matches_nothing() {
        assert!(find_paths(&items(), &[sel("k")]).is_empty());
    }

    #[test]
    fn nested_dict_patterns() {
        let doc: Value = [(
            "apps",
            [
                ("Firefox", [("version", Value::from("120.0"))].into_iter().collect()),
                ("Slack", [("version", Value::from("4.1"))].into_iter().collect()),
                ("Zoom", [("build", Value::Integer(3))].into_iter().collect()),
            ]
            .into_iter()
            .collect::<Value>(),
        )]
        .into_iter()
        .collect();

        let found = find_paths(&doc, &[sel("^apps$"), sel("."), sel("^version$")]);
        assert_eq!(
            found,
            vec![path!["apps", "Firefox", "version"], path!["apps", "Slack", "version"]]
        );
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(matches!(
            Selector::parse("(unclosed"),
            Err(PathError::InvalidPattern { .. })
        ));
    }
}
