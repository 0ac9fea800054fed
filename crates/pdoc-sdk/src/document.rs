use std::path::{Path as FsPath, PathBuf};

use pdoc_diff::{DiffOptions, DiffRecord};
use pdoc_path::{ForcedStep, Leaf, Selector};
use pdoc_types::{Native, Path, Step, Value};
use tracing::info;

use crate::error::{SdkError, SdkResult};

/// A property-list document: a value tree plus the file it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: Value,
    source: Option<PathBuf>,
}

impl Document {
    /// Wrap an in-memory tree that has no file yet.
    pub fn new(root: Value) -> Self {
        Self { root, source: None }
    }

    /// Read and parse the document at `path`.
    pub fn open(path: impl AsRef<FsPath>) -> SdkResult<Self> {
        let path = path.as_ref();
        let root = pdoc_codec::load(path)?;
        info!(path = %path.display(), kind = %root.kind(), "opened document");
        Ok(Self {
            root,
            source: Some(path.to_path_buf()),
        })
    }

    /// Attach the file future saves go to.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&FsPath> {
        self.source.as_deref()
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    // ---- Persistence ----

    /// Write the document back to the file it came from.
    pub fn save(&self) -> SdkResult<()> {
        let path = self.source.as_deref().ok_or(SdkError::NoSource)?;
        pdoc_codec::save(&self.root, path)?;
        info!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Write the document to `path`, which becomes its new source.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> SdkResult<()> {
        self.source = Some(path.into());
        self.save()
    }

    pub fn to_xml(&self) -> SdkResult<String> {
        Ok(pdoc_codec::serialize(&self.root)?)
    }

    // ---- Queries ----

    pub fn get(&self, path: &[Step]) -> Option<&Value> {
        pdoc_path::get(&self.root, path)
    }

    pub fn get_string(&self, path: &[Step]) -> Option<String> {
        pdoc_path::get_string(&self.root, path)
    }

    pub fn find_paths(&self, selectors: &[Selector]) -> Vec<Path> {
        pdoc_path::find_paths(&self.root, selectors)
    }

    pub fn to_native(&self, convert_all: bool) -> Native<'_> {
        self.root.to_native(convert_all)
    }

    // ---- Mutation ----

    pub fn set_forced(&mut self, steps: &[ForcedStep], leaf: &Leaf) -> SdkResult<()> {
        pdoc_path::set_forced(&mut self.root, steps, leaf)?;
        Ok(())
    }

    pub fn set(&mut self, parent: &[Step], slot: impl Into<Step>, value: Value) -> SdkResult<()> {
        pdoc_path::set(&mut self.root, parent, slot, value)?;
        Ok(())
    }

    pub fn remove(&mut self, parent: &[Step], slot: impl Into<Step>) -> bool {
        pdoc_path::remove(&mut self.root, parent, slot)
    }

    // ---- Diff and merge ----

    pub fn diff(&self, other: &Document, options: &DiffOptions) -> SdkResult<Vec<DiffRecord>> {
        Ok(pdoc_diff::diff(&self.root, &other.root, options)?)
    }

    /// Graft what `other` has and this document lacks into this document.
    pub fn combine(&mut self, other: &Document) -> SdkResult<()> {
        pdoc_diff::combine(&mut self.root, &other.root)?;
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Value::dict())
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}
