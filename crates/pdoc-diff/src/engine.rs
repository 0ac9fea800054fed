//! The recursive structural walk behind diff and merge.
//!
//! Containers of the same kind are compared element-wise (arrays by index,
//! dicts by key) down to the configured depth. Scalars of the same kind are
//! compared by their rendered text. Anything else differs outright.
//!
//! Merging uses the same walk. Instead of reporting what only the second
//! document has, the walk queues it as a graft into the first. A
//! disagreement or a depth cut aborts the merge; grafts queued before that
//! point are still applied, since the walk and the grafting run in the
//! same left-to-right order.

use pdoc_types::{Path, Step, Value};
use tracing::debug;

use crate::error::{DiffError, DiffResult};
use crate::options::{DiffMode, DiffOptions};
use crate::record::{ChangeKind, DiffRecord};
use crate::sink::{DiffSink, LogSink};

/// A subtree of the second document to be placed into the first.
struct Graft {
    parent: Path,
    slot: Step,
    value: Value,
}

struct Walker<'o, 's> {
    options: &'o DiffOptions,
    sink: &'s mut dyn DiffSink,
    merging: bool,
    grafts: Vec<Graft>,
}

impl Walker<'_, '_> {
    fn report(&mut self, record: DiffRecord) -> DiffResult<()> {
        if self.merging {
            match record.kind {
                ChangeKind::Differs => {
                    return Err(DiffError::MergeConflict {
                        path: record.path,
                        first: record.first.unwrap_or_default(),
                        second: record.second.unwrap_or_default(),
                    })
                }
                ChangeKind::DepthTruncated => {
                    return Err(DiffError::MergeDepthUnsupported {
                        path: record.path,
                        kind: record.first.unwrap_or_default(),
                    })
                }
                _ => {}
            }
        }
        if self.options.filter.contains(record.kind) {
            self.sink.record(record);
        }
        Ok(())
    }

    fn walk(&mut self, a: &Value, b: &Value, path: &mut Path, depth: usize) -> DiffResult<()> {
        match (a, b) {
            (Value::Dict(_), Value::Dict(_)) | (Value::Array(_), Value::Array(_))
                if !self.options.descends(depth) =>
            {
                self.report(DiffRecord::depth_truncated(path.clone(), a.kind().to_string()))
            }
            (Value::Dict(left), Value::Dict(right)) => {
                for (key, left_value) in left {
                    path.push(key.as_str());
                    let outcome = match right.get(key) {
                        Some(right_value) => self.walk(left_value, right_value, path, depth + 1),
                        None => self.report(DiffRecord::missing_from_second(
                            path.clone(),
                            left_value.render(),
                        )),
                    };
                    path.pop();
                    outcome?;
                }
                for (key, right_value) in right {
                    if left.contains_key(key) {
                        continue;
                    }
                    self.only_in_second(path, Step::from(key.as_str()), right_value)?;
                }
                Ok(())
            }
            (Value::Array(left), Value::Array(right)) => {
                for (index, left_value) in left.iter().enumerate() {
                    path.push(index);
                    let outcome = match right.get(index) {
                        Some(right_value) => self.walk(left_value, right_value, path, depth + 1),
                        None => self.report(DiffRecord::missing_from_second(
                            path.clone(),
                            left_value.render(),
                        )),
                    };
                    path.pop();
                    outcome?;
                }
                for (index, right_value) in right.iter().enumerate().skip(left.len()) {
                    self.only_in_second(path, Step::Index(index), right_value)?;
                }
                Ok(())
            }
            _ => {
                let first = a.render();
                let second = b.render();
                if a.kind() == b.kind() && first == second {
                    self.report(DiffRecord::equal(path.clone(), first))
                } else {
                    self.report(DiffRecord::differs(path.clone(), first, second))
                }
            }
        }
    }

    fn only_in_second(&mut self, parent: &Path, slot: Step, value: &Value) -> DiffResult<()> {
        if self.merging {
            self.grafts.push(Graft {
                parent: parent.clone(),
                slot,
                value: value.clone(),
            });
            Ok(())
        } else {
            self.report(DiffRecord::missing_from_first(parent.join(slot), value.render()))
        }
    }
}

fn walk(
    a: &Value,
    b: &Value,
    options: &DiffOptions,
    sink: &mut dyn DiffSink,
    merging: bool,
) -> (DiffResult<()>, Vec<Graft>) {
    let mut walker = Walker {
        options,
        sink,
        merging,
        grafts: Vec::new(),
    };
    let mut path = Path::root();
    let outcome = walker.walk(a, b, &mut path, 0);
    (outcome, walker.grafts)
}

/// Stream the differences between `a` and `b` into `sink`.
///
/// Merge mode is refused here; see [`merge_into`].
pub fn diff_with(
    a: &Value,
    b: &Value,
    options: &DiffOptions,
    sink: &mut dyn DiffSink,
) -> DiffResult<()> {
    if options.mode == DiffMode::MergeIntoFirst {
        return Err(DiffError::ReadOnlyMerge);
    }
    walk(a, b, options, sink, false).0
}

/// Compare `a` with `b`.
///
/// In [`DiffMode::Collect`] the filtered records are returned. In
/// [`DiffMode::Emit`] they are logged through [`LogSink`] as they are found
/// and nothing is returned.
pub fn diff(a: &Value, b: &Value, options: &DiffOptions) -> DiffResult<Vec<DiffRecord>> {
    match options.mode {
        DiffMode::Collect => {
            let mut records = Vec::new();
            diff_with(a, b, options, &mut records)?;
            Ok(records)
        }
        DiffMode::Emit => {
            diff_with(a, b, options, &mut LogSink)?;
            Ok(Vec::new())
        }
        DiffMode::MergeIntoFirst => Err(DiffError::ReadOnlyMerge),
    }
}

/// Graft everything `b` has that `a` lacks into `a`.
///
/// Runs in merge mode whatever `options.mode` says. The filtered records of
/// the walk (values only in `a`, equal values) are returned. A value
/// disagreement or a depth cut aborts with an error, leaving `a` holding the
/// grafts made before that point.
pub fn merge_into(a: &mut Value, b: &Value, options: &DiffOptions) -> DiffResult<Vec<DiffRecord>> {
    let mut records = Vec::new();
    let (outcome, grafts) = walk(a, b, options, &mut records, true);

    for graft in grafts {
        debug!(parent = %graft.parent, slot = %graft.slot, "merge graft");
        pdoc_path::set(a, &graft.parent, graft.slot, graft.value)?;
    }

    outcome.map(|()| records)
}

/// Merge `b` into `a` with default options and hand back the merged `a`.
pub fn combine<'a>(a: &'a mut Value, b: &Value) -> DiffResult<&'a mut Value> {
    merge_into(a, b, &DiffOptions::new(DiffMode::MergeIntoFirst))?;
    Ok(a)
}
