//! The engine surface as plain functions over bare [`Value`] trees.
//!
//! `load` and `save` report failures through the log and an absent result
//! instead of an error, for batch callers that move on to the next
//! document. Everything else mirrors the lower crates.

use std::path::Path as FsPath;

use pdoc_path::{ForcedStep, Leaf};
use pdoc_types::{NodeKind, Value};
use serde_json::{Map, Value as Json};
use tracing::error;

use crate::error::SdkResult;

pub use pdoc_diff::{combine, diff};
pub use pdoc_path::{find_paths, get, get_string, remove, set};

/// Read the document at `path`, or `None` (logged) if it cannot be read.
pub fn load(path: impl AsRef<FsPath>) -> Option<Value> {
    let path = path.as_ref();
    match pdoc_codec::load(path) {
        Ok(root) => Some(root),
        Err(e) => {
            error!(path = %path.display(), error = %e, "load failed");
            None
        }
    }
}

/// Write `root` to `path`; `false` (logged) if it could not be written.
pub fn save(root: &Value, path: impl AsRef<FsPath>) -> bool {
    let path = path.as_ref();
    match pdoc_codec::save(root, path) {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), error = %e, "save failed");
            false
        }
    }
}

/// Forced write from textual tokens.
///
/// Each pair is a container token (`dict`, `array`, `array-insert`) and a
/// slot token (a key, an index, `add`, `add_if_missing`); the leaf is a
/// node-kind token and its raw text.
pub fn set_forced(
    root: &mut Value,
    steps: &[(&str, &str)],
    leaf_kind: &str,
    leaf_value: &str,
) -> SdkResult<()> {
    let steps = steps
        .iter()
        .map(|(kind, slot)| Ok(ForcedStep::new(kind.parse()?, pdoc_path::Slot::parse(slot))))
        .collect::<SdkResult<Vec<_>>>()?;
    let leaf = Leaf::new(leaf_kind.parse::<NodeKind>()?, leaf_value);
    pdoc_path::set_forced(root, &steps, &leaf)?;
    Ok(())
}

pub fn to_native(root: &Value, convert_all: bool) -> Json {
    root.to_native(convert_all).into_json()
}

pub fn from_native_dict(map: &Map<String, Json>) -> Value {
    Value::from_native_dict(map)
}

pub fn from_native_array(items: &[Json]) -> Value {
    Value::from_native_array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdoc_types::path;

    #[test]
    fn load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path().join("nothing.plist")).is_none());
    }

    #[test]
    fn save_into_missing_directory_is_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!save(&Value::dict(), dir.path().join("no/such/dir/x.plist")));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x.plist");
        let doc: Value = [("n", Value::Integer(3))].into_iter().collect();
        assert!(save(&doc, &file));
        assert_eq!(load(&file), Some(doc));
    }

    #[test]
    fn forced_write_from_tokens() {
        let mut doc = Value::dict();
        set_forced(
            &mut doc,
            &[("dict", "urls"), ("array", "add_if_missing")],
            "string",
            "https://example.org",
        )
        .unwrap();
        set_forced(
            &mut doc,
            &[("dict", "urls"), ("array", "add_if_missing")],
            "string",
            "https://example.org",
        )
        .unwrap();
        assert_eq!(
            get(&doc, &path!["urls"]),
            Some(&Value::Array(vec![Value::from("https://example.org")]))
        );
    }

    #[test]
    fn bad_tokens_are_errors() {
        let mut doc = Value::dict();
        assert!(set_forced(&mut doc, &[("matrix", "a")], "string", "v").is_err());
        assert!(set_forced(&mut doc, &[("dict", "a")], "complex", "v").is_err());
        assert!(set_forced(&mut doc, &[("dict", "a")], "int", "many").is_err());
        assert_eq!(doc, Value::dict());
    }

    #[test]
    fn native_round_trip() {
        let json = serde_json::json!({"name": "demo", "tags": ["a", "b"]});
        let doc = from_native_dict(json.as_object().unwrap());
        assert_eq!(to_native(&doc, true), json);
        let arr = from_native_array(&[serde_json::json!(1)]);
        assert_eq!(arr, Value::Array(vec![Value::from("1")]));
    }
}
