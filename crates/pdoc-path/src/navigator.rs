//! Read-only traversal of a document by path.
//!
//! A missing dict key is absence, not an error: [`lookup`] returns
//! `Ok(None)` when the final step names a key that is not there. Stepping
//! *past* such an absence is [`PathError::AccessOnNil`], because the caller
//! is chaining blindly through a path that already failed.

use pdoc_types::{Path, Step, Value, ValueKind};
use tracing::warn;

use crate::error::{PathError, PathResult};

/// Resolve `path` from `root`.
pub fn lookup<'a>(root: &'a Value, path: &[Step]) -> PathResult<Option<&'a Value>> {
    let mut current = Some(root);

    for (depth, step) in path.iter().enumerate() {
        let node = current.ok_or_else(|| PathError::AccessOnNil {
            path: Path::from(&path[..depth]),
        })?;

        current = match (node, step) {
            (Value::Array(items), Step::Index(index)) => {
                if *index >= items.len() {
                    return Err(PathError::IndexOutOfRange {
                        path: Path::from(&path[..depth]),
                        index: *index,
                        len: items.len(),
                    });
                }
                Some(&items[*index])
            }
            (Value::Dict(map), Step::Key(key)) => map.get(key),
            (other, _) => {
                return Err(PathError::UnsupportedContainerType {
                    path: Path::from(&path[..depth]),
                    kind: other.kind(),
                    step: step.clone(),
                })
            }
        };
    }

    Ok(current)
}

/// Mutable counterpart of [`lookup`].
pub fn lookup_mut<'a>(root: &'a mut Value, path: &[Step]) -> PathResult<Option<&'a mut Value>> {
    let mut current = Some(root);

    for (depth, step) in path.iter().enumerate() {
        let node = current.ok_or_else(|| PathError::AccessOnNil {
            path: Path::from(&path[..depth]),
        })?;

        current = match node {
            Value::Array(items) => {
                let Step::Index(index) = step else {
                    return Err(unsupported(path, depth, ValueKind::Array));
                };
                let len = items.len();
                match items.get_mut(*index) {
                    Some(item) => Some(item),
                    None => {
                        return Err(PathError::IndexOutOfRange {
                            path: Path::from(&path[..depth]),
                            index: *index,
                            len,
                        })
                    }
                }
            }
            Value::Dict(map) => {
                let Step::Key(key) = step else {
                    return Err(unsupported(path, depth, ValueKind::Dict));
                };
                map.get_mut(key)
            }
            other => return Err(unsupported(path, depth, other.kind())),
        };
    }

    Ok(current)
}

fn unsupported(path: &[Step], depth: usize, kind: ValueKind) -> PathError {
    PathError::UnsupportedContainerType {
        path: Path::from(&path[..depth]),
        kind,
        step: path[depth].clone(),
    }
}

/// Resolve `path`, logging any traversal failure and reporting it as absence.
pub fn get<'a>(root: &'a Value, path: &[Step]) -> Option<&'a Value> {
    match lookup(root, path) {
        Ok(found) => found,
        Err(e) => {
            warn!(path = %Path::from(path), error = %e, "path lookup failed");
            None
        }
    }
}

/// Mutable counterpart of [`get`].
pub fn get_mut<'a>(root: &'a mut Value, path: &[Step]) -> Option<&'a mut Value> {
    match lookup_mut(root, path) {
        Ok(found) => found,
        Err(e) => {
            warn!(path = %Path::from(path), error = %e, "path lookup failed");
            None
        }
    }
}

/// Resolve `path` to the text of a scalar. Containers have no text.
pub fn get_string(root: &Value, path: &[Step]) -> Option<String> {
    get(root, path).and_then(Value::text)
}
