//! Per-application version state that accumulates across runs.
//!
//! The ledger is an ordinary property-list document whose root dict is
//! keyed by application name:
//!
//! ```text
//! <app> = { version = "1.2", url = "...", checked = <date>, history = ["1.1", "1.2"] }
//! ```

use std::path::{Path as FsPath, PathBuf};

use chrono::Utc;
use pdoc_path::{ForcedStep, Leaf, Slot};
use pdoc_types::{format_date, path, Date, NodeKind, Value};
use serde::Serialize;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{SdkError, SdkResult};

const VERSION: &str = "version";
const URL: &str = "url";
const CHECKED: &str = "checked";
const HISTORY: &str = "history";

/// Typed view of one application's entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub name: String,
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<Date>,
    pub history: Vec<String>,
}

impl AppState {
    fn from_entry(name: &str, entry: &Value) -> Self {
        let text = |key: &str| entry.as_dict().and_then(|m| m.get(key)).and_then(Value::text);
        let checked = match entry.as_dict().and_then(|m| m.get(CHECKED)) {
            Some(Value::Date(d)) => Some(*d),
            _ => None,
        };
        let history = entry
            .as_dict()
            .and_then(|m| m.get(HISTORY))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::text).collect())
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            version: text(VERSION),
            url: text(URL),
            checked,
            history,
        }
    }
}

/// The status document tracking every application's last seen version.
#[derive(Debug)]
pub struct StateLedger {
    doc: Document,
}

impl StateLedger {
    /// Open the ledger at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<FsPath>) -> SdkResult<Self> {
        let path = path.as_ref();
        let doc = if path.exists() {
            Document::open(path)?
        } else {
            debug!(path = %path.display(), "no state document yet, starting empty");
            Document::default().with_source(PathBuf::from(path))
        };
        if doc.root().as_dict().is_none() {
            return Err(SdkError::InvalidState(format!(
                "root of {} is a {}, expected a dict",
                path.display(),
                doc.root().kind()
            )));
        }
        Ok(Self { doc })
    }

    /// A ledger that lives only in memory until [`StateLedger::save_as`].
    pub fn in_memory() -> Self {
        Self {
            doc: Document::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Record that `app` was seen at `version`. Returns whether the version
    /// differs from the one recorded before; an app's first record counts
    /// as a change.
    pub fn record(
        &mut self,
        app: &str,
        version: &str,
        url: Option<&str>,
        at: Date,
    ) -> SdkResult<bool> {
        let previous = self.current_version(app);
        let changed = previous.as_deref() != Some(version);

        let field = |name: &str| [ForcedStep::dict(app), ForcedStep::dict(name)];
        self.doc.set_forced(&field(VERSION), &Leaf::string(version))?;
        if let Some(url) = url {
            self.doc.set_forced(&field(URL), &Leaf::string(url))?;
        }
        self.doc
            .set_forced(&field(CHECKED), &Leaf::new(NodeKind::Date, format_date(&at)))?;
        self.doc.set_forced(
            &[
                ForcedStep::dict(app),
                ForcedStep::dict(HISTORY),
                ForcedStep::array(Slot::AppendIfMissing),
            ],
            &Leaf::string(version),
        )?;

        if changed {
            info!(
                app,
                version,
                previous = previous.as_deref().unwrap_or("none"),
                "new version recorded"
            );
        }
        Ok(changed)
    }

    /// [`StateLedger::record`] stamped with the current time.
    pub fn record_now(&mut self, app: &str, version: &str, url: Option<&str>) -> SdkResult<bool> {
        self.record(app, version, url, Utc::now())
    }

    pub fn current_version(&self, app: &str) -> Option<String> {
        self.doc.get_string(&path![app, VERSION])
    }

    pub fn app(&self, app: &str) -> Option<AppState> {
        self.doc
            .get(&path![app])
            .map(|entry| AppState::from_entry(app, entry))
    }

    /// Names of every tracked application, sorted.
    pub fn apps(&self) -> Vec<String> {
        self.doc
            .root()
            .as_dict()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Every tracked application's entry, sorted by name.
    pub fn states(&self) -> Vec<AppState> {
        self.doc
            .root()
            .as_dict()
            .map(|map| {
                map.iter()
                    .map(|(name, entry)| AppState::from_entry(name, entry))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drop `app` from the ledger. Returns whether it was tracked.
    pub fn forget(&mut self, app: &str) -> bool {
        let tracked = self.doc.get(&path![app]).is_some();
        tracked && self.doc.remove(&[], app)
    }

    pub fn save(&self) -> SdkResult<()> {
        self.doc.save()
    }

    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> SdkResult<()> {
        self.doc.save_as(path)
    }
}
