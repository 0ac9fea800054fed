//! Precondition-checked set and remove.
//!
//! Both operations resolve the parent path first and never create or
//! coerce containers: the caller guarantees the document already has the
//! expected shape.

use pdoc_types::{Path, Step, Value};
use tracing::warn;

use crate::error::{PathError, PathResult};
use crate::navigator::lookup_mut;

fn resolve_parent<'a>(root: &'a mut Value, parent: &[Step]) -> PathResult<&'a mut Value> {
    match lookup_mut(root, parent) {
        Ok(Some(node)) => Ok(node),
        Ok(None) | Err(_) => Err(PathError::ParentNotFound {
            path: Path::from(parent),
        }),
    }
}

/// Store `value` under `slot` in the container at `parent`, without
/// logging failures. See [`set`].
pub fn try_set(root: &mut Value, parent: &[Step], slot: Step, value: Value) -> PathResult<()> {
    let node = resolve_parent(root, parent)?;
    match (node, slot) {
        (Value::Array(items), Step::Index(index)) => {
            if index >= items.len() {
                items.push(value);
            } else {
                items[index] = value;
            }
            Ok(())
        }
        (Value::Dict(map), Step::Key(key)) => {
            map.insert(key, value);
            Ok(())
        }
        (Value::Dict(map), Step::Index(index)) => {
            map.insert(index.to_string(), value);
            Ok(())
        }
        (other, _) => Err(PathError::StructuralMismatch {
            path: Path::from(parent),
            expected: "array index or dict key".to_string(),
            found: other.kind(),
        }),
    }
}

/// Store `value` under `slot` in the container at `parent`.
///
/// In an array an index past the end appends, otherwise the element is
/// replaced. In a dict the key is set.
pub fn set(root: &mut Value, parent: &[Step], slot: impl Into<Step>, value: Value) -> PathResult<()> {
    let slot = slot.into();
    try_set(root, parent, slot.clone(), value).map_err(|e| {
        warn!(parent = %Path::from(parent), slot = %slot, error = %e, "set failed");
        e
    })
}

/// Remove `slot` from the container at `parent`.
///
/// Returns `Ok(false)` when an array index is out of bounds; removing an
/// absent dict key is a harmless `Ok(true)`.
pub fn try_remove(root: &mut Value, parent: &[Step], slot: &Step) -> PathResult<bool> {
    let node = resolve_parent(root, parent)?;
    match (node, slot) {
        (Value::Array(items), Step::Index(index)) => {
            if *index >= items.len() {
                warn!(
                    parent = %Path::from(parent),
                    index,
                    len = items.len(),
                    precondition = "impossible",
                    "remove past end of array"
                );
                return Ok(false);
            }
            items.remove(*index);
            Ok(true)
        }
        (Value::Dict(map), Step::Key(key)) => {
            map.remove(key);
            Ok(true)
        }
        (Value::Dict(map), Step::Index(index)) => {
            map.remove(&index.to_string());
            Ok(true)
        }
        (other, _) => Err(PathError::StructuralMismatch {
            path: Path::from(parent),
            expected: "array index or dict key".to_string(),
            found: other.kind(),
        }),
    }
}

/// Logging form of [`try_remove`]: any failure is reported as `false`.
pub fn remove(root: &mut Value, parent: &[Step], slot: impl Into<Step>) -> bool {
    let slot = slot.into();
    match try_remove(root, parent, &slot) {
        Ok(removed) => removed,
        Err(e) => {
            warn!(parent = %Path::from(parent), slot = %slot, error = %e, "remove failed");
            false
        }
    }
}
