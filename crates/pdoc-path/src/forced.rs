//! Write-with-creation.
//!
//! A forced write walks a list of [`ForcedStep`]s from the root, creating
//! any container that is missing and replacing any node whose kind is not
//! the one the path asks for, then places a typed [`Leaf`] at the end.
//!
//! Each step records the kind of the container it addresses *into*. The
//! kind a step expects to find at its own location is therefore the
//! container kind of the step after it, or the leaf kind for the last step.
//! Whether an array slot inserts or replaces is likewise decided by the
//! container kind on that step, i.e. by how the parent was declared.
//!
//! Re-applying the same write is a no-op. A failure part way through
//! leaves earlier steps applied; there is no rollback.

use std::fmt;
use std::str::FromStr;

use pdoc_types::{NodeKind, Path, Step, TypeError, TypeResult, Value};
use tracing::{debug, error};

use crate::error::{PathError, PathResult};

/// Kind of container a forced step addresses into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Dict,
    /// Array whose indexed slots are replaced in place.
    Array,
    /// Array whose indexed slots are inserted before the existing element.
    ArrayInsert,
}

impl ContainerKind {
    fn is_array(&self) -> bool {
        matches!(self, Self::Array | Self::ArrayInsert)
    }

    fn node_kind(&self) -> NodeKind {
        match self {
            Self::Dict => NodeKind::Dict,
            Self::Array | Self::ArrayInsert => NodeKind::Array,
        }
    }

    fn empty(&self) -> Value {
        match self {
            Self::Dict => Value::dict(),
            Self::Array | Self::ArrayInsert => Value::array(),
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Dict => "dict",
            Self::Array => "array",
            Self::ArrayInsert => "array-insert",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ContainerKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('-') {
            "dict" => Ok(Self::Dict),
            "array" => Ok(Self::Array),
            "array-insert" | "insert" => Ok(Self::ArrayInsert),
            _ => Err(TypeError::UnknownValueKind(s.to_string())),
        }
    }
}

/// Where a step lands inside its container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Key(String),
    Index(usize),
    /// Append a new element.
    Append,
    /// Append unless an equal element is already present.
    AppendIfMissing,
}

impl Slot {
    /// Parse a slot token: `add`, `+` and `push` append, `add_if_missing`
    /// appends conditionally, digits are an index, anything else is a key.
    pub fn parse(text: &str) -> Self {
        match text {
            "add" | "+" | "push" => Self::Append,
            "add_if_missing" => Self::AppendIfMissing,
            _ => text
                .parse::<usize>()
                .map(Self::Index)
                .unwrap_or_else(|_| Self::Key(text.to_string())),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
            Self::Append => f.write_str("add"),
            Self::AppendIfMissing => f.write_str("add_if_missing"),
        }
    }
}

/// One typed step of a forced write.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForcedStep {
    pub container: ContainerKind,
    pub slot: Slot,
}

impl ForcedStep {
    pub fn new(container: ContainerKind, slot: Slot) -> Self {
        Self { container, slot }
    }

    /// A key inside a dict.
    pub fn dict(key: impl Into<String>) -> Self {
        Self::new(ContainerKind::Dict, Slot::Key(key.into()))
    }

    /// A replace-in-place slot inside an array.
    pub fn array(slot: Slot) -> Self {
        Self::new(ContainerKind::Array, slot)
    }

    /// An insert-before slot inside an array.
    pub fn insert(slot: Slot) -> Self {
        Self::new(ContainerKind::ArrayInsert, slot)
    }
}

impl fmt::Display for ForcedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container, self.slot)
    }
}

/// Parses the `KIND:SLOT` form produced by `Display`.
impl FromStr for ForcedStep {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, slot) = s
            .split_once(':')
            .ok_or_else(|| TypeError::UnknownValueKind(s.to_string()))?;
        Ok(Self::new(kind.parse()?, Slot::parse(slot)))
    }
}

/// The typed value a forced write places at the end of its path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Leaf {
    pub kind: NodeKind,
    pub raw: String,
}

impl Leaf {
    pub fn new(kind: NodeKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    pub fn string(raw: impl Into<String>) -> Self {
        Self::new(NodeKind::String, raw)
    }

    pub fn build(&self) -> TypeResult<Value> {
        self.kind.build(&self.raw)
    }
}

/// What a step expects to find, or must create, at its location.
enum Target<'v> {
    Container(ContainerKind),
    Leaf(&'v Value),
}

impl Target<'_> {
    fn fits(&self, existing: &Value) -> bool {
        match self {
            Self::Container(kind) => kind.node_kind().matches(existing),
            Self::Leaf(leaf) => leaf_fits(leaf, existing),
        }
    }

    fn fresh(&self) -> Value {
        match self {
            Self::Container(kind) => kind.empty(),
            Self::Leaf(leaf) => (*leaf).clone(),
        }
    }
}

/// A container leaf only asks for the right kind, so an existing container
/// keeps its contents. A scalar leaf must match exactly.
fn leaf_fits(leaf: &Value, existing: &Value) -> bool {
    if leaf.is_container() {
        existing.kind() == leaf.kind()
    } else {
        existing == leaf
    }
}

/// Apply a forced write of `leaf` at `steps` under `root`.
///
/// With no steps the root itself is replaced by the leaf.
pub fn set_forced(root: &mut Value, steps: &[ForcedStep], leaf: &Leaf) -> PathResult<()> {
    let leaf_value = leaf.build()?;

    if steps.is_empty() {
        if !leaf_fits(&leaf_value, root) {
            *root = leaf_value;
        }
        return Ok(());
    }

    let mut cursor = root;
    let mut at = Path::root();

    for (i, step) in steps.iter().enumerate() {
        let target = match steps.get(i + 1) {
            Some(next) => Target::Container(next.container),
            None => Target::Leaf(&leaf_value),
        };

        let landed = match place(cursor, step, &target, &at) {
            Ok(landed) => landed,
            Err(e) => {
                error!(path = %at, step = %step, error = %e, "forced write aborted");
                return Err(e);
            }
        };
        at.push(landed.clone());

        if matches!(target, Target::Leaf(_)) {
            break;
        }
        cursor = match cursor.child_mut(&landed) {
            Some(child) => child,
            None => return Err(PathError::AccessOnNil { path: at }),
        };
    }

    debug!(path = %at, kind = %leaf.kind, "forced write applied");
    Ok(())
}

/// Make sure `step`'s location under `parent` holds something fitting
/// `target`, creating or replacing as needed. Returns the concrete step
/// that now addresses that location.
fn place(parent: &mut Value, step: &ForcedStep, target: &Target<'_>, at: &Path) -> PathResult<Step> {
    let found = parent.kind();
    let mismatch = |expected: &str| PathError::StructuralMismatch {
        path: at.clone(),
        expected: expected.to_string(),
        found,
    };

    if step.container == ContainerKind::Dict {
        let map = parent.as_dict_mut().ok_or_else(|| mismatch("dict"))?;
        let key = match &step.slot {
            Slot::Key(key) => key.clone(),
            Slot::Index(index) => index.to_string(),
            Slot::Append | Slot::AppendIfMissing => return Err(mismatch("array")),
        };
        let keep = map.get(&key).is_some_and(|existing| target.fits(existing));
        if !keep {
            map.insert(key.clone(), target.fresh());
        }
        return Ok(Step::Key(key));
    }

    debug_assert!(step.container.is_array());
    let items = parent.as_array_mut().ok_or_else(|| mismatch("array"))?;

    match &step.slot {
        Slot::Key(_) => Err(mismatch("dict")),
        Slot::Append => {
            items.push(target.fresh());
            Ok(Step::Index(items.len() - 1))
        }
        Slot::AppendIfMissing => {
            let node = target.fresh();
            match items.iter().position(|existing| *existing == node) {
                Some(index) => Ok(Step::Index(index)),
                None => {
                    items.push(node);
                    Ok(Step::Index(items.len() - 1))
                }
            }
        }
        Slot::Index(index) => {
            let index = *index;
            let inserting = step.container == ContainerKind::ArrayInsert;
            // Insertion is valid up to `len`, replacement only below it.
            let needed = if inserting { index } else { index + 1 };
            if items.len() < needed {
                items.resize(needed, Value::String(String::new()));
            }

            let keep = items.get(index).is_some_and(|existing| target.fits(existing));
            if !keep {
                if inserting {
                    items.insert(index, target.fresh());
                } else {
                    items[index] = target.fresh();
                }
            }
            Ok(Step::Index(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::get;
    use pdoc_types::{path, Dictionary};

    fn strings(items: &[&str]) -> Value {
        Value::Array(items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn step_tokens_parse() {
        assert_eq!("dict:name".parse::<ForcedStep>().unwrap(), ForcedStep::dict("name"));
        assert_eq!(
            "array-insert:0".parse::<ForcedStep>().unwrap(),
            ForcedStep::insert(Slot::Index(0))
        );
        assert_eq!(
            "-array:add_if_missing".parse::<ForcedStep>().unwrap(),
            ForcedStep::array(Slot::AppendIfMissing)
        );
        let step = ForcedStep::array(Slot::Append);
        assert_eq!(step.to_string().parse::<ForcedStep>().unwrap(), step);
        assert!("name".parse::<ForcedStep>().is_err());
        assert!("matrix:0".parse::<ForcedStep>().is_err());
    }

    #[test]
    fn dict_leaf_keeps_existing_dict() {
        let mut doc: Value = [("a", [("keep", Value::Integer(1))].into_iter().collect())]
            .into_iter()
            .collect();
        set_forced(&mut doc, &[ForcedStep::dict("a")], &Leaf::new(NodeKind::Dict, "")).unwrap();
        assert_eq!(get(&doc, &path!["a", "keep"]), Some(&Value::Integer(1)));
    }

    #[test]
    fn array_leaf_keeps_existing_array() {
        let mut doc: Value = [("list", strings(&["x", "y"]))].into_iter().collect();
        set_forced(&mut doc, &[ForcedStep::dict("list")], &Leaf::new(NodeKind::Array, "")).unwrap();
        assert_eq!(get(&doc, &path!["list"]), Some(&strings(&["x", "y"])));
    }

    #[test]
    fn container_leaf_replaces_other_kind() {
        let mut doc: Value = [("a", strings(&["x"]))].into_iter().collect();
        set_forced(&mut doc, &[ForcedStep::dict("a")], &Leaf::new(NodeKind::Dict, "")).unwrap();
        assert_eq!(get(&doc, &path!["a"]), Some(&Value::dict()));
    }

    #[test]
    fn container_leaf_at_root_keeps_contents() {
        let mut doc: Value = [("k", Value::from("v"))].into_iter().collect();
        let before = doc.clone();
        set_forced(&mut doc, &[], &Leaf::new(NodeKind::Dict, "")).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn creates_nested_dicts() {
        let mut doc = Value::dict();
        set_forced(
            &mut doc,
            &[ForcedStep::dict("a"), ForcedStep::dict("b")],
            &Leaf::string("v1"),
        )
        .unwrap();

        let expected: Value = [("a", [("b", Value::from("v1"))].into_iter().collect())]
            .into_iter()
            .collect();
        assert_eq!(doc, expected);
    }

    #[test]
    fn reapplying_is_a_no_op() {
        let steps = [
            ForcedStep::dict("apps"),
            ForcedStep::insert(Slot::Index(0)),
            ForcedStep::dict("name"),
        ];
        let leaf = Leaf::string("Firefox");

        let mut once = Value::dict();
        set_forced(&mut once, &steps, &leaf).unwrap();
        let mut twice = once.clone();
        set_forced(&mut twice, &steps, &leaf).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn mismatched_intermediate_is_replaced() {
        let mut doc: Value = [("a", Value::from("scalar"))].into_iter().collect();
        set_forced(
            &mut doc,
            &[ForcedStep::dict("a"), ForcedStep::dict("b")],
            &Leaf::new(NodeKind::Int, "7"),
        )
        .unwrap();
        assert_eq!(get(&doc, &path!["a", "b"]), Some(&Value::Integer(7)));
    }

    #[test]
    fn different_leaf_kind_replaces_subtree() {
        let mut doc = Value::dict();
        let steps = [ForcedStep::dict("a"), ForcedStep::dict("b")];
        set_forced(&mut doc, &steps, &Leaf::string("v1")).unwrap();
        set_forced(&mut doc, &[ForcedStep::dict("a")], &Leaf::new(NodeKind::Bool, "true")).unwrap();
        assert_eq!(get(&doc, &path!["a"]), Some(&Value::Bool(true)));
    }

    #[test]
    fn existing_siblings_survive() {
        let mut doc: Value = [("a", [("keep", Value::Integer(1))].into_iter().collect())]
            .into_iter()
            .collect();
        set_forced(
            &mut doc,
            &[ForcedStep::dict("a"), ForcedStep::dict("new")],
            &Leaf::string("x"),
        )
        .unwrap();
        assert_eq!(get(&doc, &path!["a", "keep"]), Some(&Value::Integer(1)));
        assert_eq!(get(&doc, &path!["a", "new"]), Some(&Value::from("x")));
    }

    #[test]
    fn replace_pads_with_empty_strings() {
        let mut doc = strings(&["a"]);
        set_forced(&mut doc, &[ForcedStep::array(Slot::Index(3))], &Leaf::string("d")).unwrap();
        assert_eq!(doc, strings(&["a", "", "", "d"]));
    }

    #[test]
    fn replace_overwrites_in_place() {
        let mut doc = strings(&["a", "b", "c"]);
        set_forced(&mut doc, &[ForcedStep::array(Slot::Index(1))], &Leaf::string("B")).unwrap();
        assert_eq!(doc, strings(&["a", "B", "c"]));
    }

    #[test]
    fn insert_shifts_right() {
        let mut doc = strings(&["a", "b"]);
        set_forced(&mut doc, &[ForcedStep::insert(Slot::Index(1))], &Leaf::string("x")).unwrap();
        assert_eq!(doc, strings(&["a", "x", "b"]));
    }

    #[test]
    fn insert_past_end_pads_then_inserts() {
        let mut doc = strings(&["a"]);
        set_forced(&mut doc, &[ForcedStep::insert(Slot::Index(3))], &Leaf::string("x")).unwrap();
        assert_eq!(doc, strings(&["a", "", "", "x"]));
    }

    #[test]
    fn append_tokens() {
        let mut doc = strings(&["a"]);
        for token in ["add", "+", "push"] {
            set_forced(&mut doc, &[ForcedStep::insert(Slot::parse(token))], &Leaf::string("z")).unwrap();
        }
        assert_eq!(doc, strings(&["a", "z", "z", "z"]));
    }

    #[test]
    fn append_if_missing_checks_equality() {
        let mut doc = strings(&["a", "b"]);
        let step = [ForcedStep::insert(Slot::parse("add_if_missing"))];
        set_forced(&mut doc, &step, &Leaf::string("b")).unwrap();
        assert_eq!(doc, strings(&["a", "b"]));
        set_forced(&mut doc, &step, &Leaf::string("c")).unwrap();
        assert_eq!(doc, strings(&["a", "b", "c"]));
    }

    #[test]
    fn append_creates_intermediate_containers() {
        let mut doc = Value::dict();
        let steps = [
            ForcedStep::dict("history"),
            ForcedStep::insert(Slot::Append),
            ForcedStep::dict("version"),
        ];
        set_forced(&mut doc, &steps, &Leaf::string("1.0")).unwrap();
        set_forced(&mut doc, &steps, &Leaf::string("1.1")).unwrap();
        assert_eq!(get(&doc, &path!["history", 0usize, "version"]), Some(&Value::from("1.0")));
        assert_eq!(get(&doc, &path!["history", 1usize, "version"]), Some(&Value::from("1.1")));
    }

    #[test]
    fn array_step_into_dict_is_structural_mismatch() {
        let mut doc: Value = [("a", Value::Integer(1))].into_iter().collect();
        let err = set_forced(&mut doc, &[ForcedStep::array(Slot::Index(0))], &Leaf::string("x"))
            .unwrap_err();
        assert!(matches!(err, PathError::StructuralMismatch { ref expected, .. } if expected == "array"));
        assert_eq!(get(&doc, &path!["a"]), Some(&Value::Integer(1)));
    }

    #[test]
    fn malformed_blob_is_rejected_before_mutation() {
        let mut doc = Value::dict();
        let err = set_forced(
            &mut doc,
            &[ForcedStep::dict("icon")],
            &Leaf::new(NodeKind::BlobHex, "not hex"),
        )
        .unwrap_err();
        assert!(matches!(err, PathError::Type(_)));
        assert_eq!(doc, Value::Dict(Dictionary::new()));
    }

    #[test]
    fn blob_leaves_decode() {
        let mut doc = Value::dict();
        set_forced(&mut doc, &[ForcedStep::dict("h")], &Leaf::new(NodeKind::BlobHex, "<6869>")).unwrap();
        set_forced(&mut doc, &[ForcedStep::dict("b")], &Leaf::new(NodeKind::BlobBase64, "aGk=")).unwrap();
        assert_eq!(get(&doc, &path!["h"]), Some(&Value::Blob(b"hi".to_vec())));
        assert_eq!(get(&doc, &path!["b"]), Some(&Value::Blob(b"hi".to_vec())));
    }

    #[test]
    fn empty_steps_replace_root() {
        let mut doc = Value::dict();
        set_forced(&mut doc, &[], &Leaf::new(NodeKind::Array, "")).unwrap();
        assert_eq!(doc, Value::array());
    }

    #[test]
    fn slot_parsing() {
        assert_eq!(Slot::parse("+"), Slot::Append);
        assert_eq!(Slot::parse("12"), Slot::Index(12));
        assert_eq!(Slot::parse("name"), Slot::Key("name".into()));
    }
}
