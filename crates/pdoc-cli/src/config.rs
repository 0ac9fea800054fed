use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pdoc_diff::DiffOptions;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "PDOC_CONFIG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    /// Ledger used by `pdoc state`.
    pub state_path: PathBuf,
    pub diff: DiffOptions,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            state_path: PathBuf::from("pdoc-state.plist"),
            diff: DiffOptions::default(),
        }
    }
}

impl CliConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `explicit`, else from `$PDOC_CONFIG`. A missing file
    /// yields the defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_toml(&text)
                    .with_context(|| format!("parsing config {}", path.display()))
            }
            _ => Ok(Self::default()),
        }
    }

    /// The configured log level; unrecognized names fall back to `warn`.
    pub fn level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::WARN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdoc_diff::{ChangeKind, ResultFilter};

    #[test]
    fn default_config() {
        let c = CliConfig::default();
        assert_eq!(c.log_level, "warn");
        assert_eq!(c.state_path, PathBuf::from("pdoc-state.plist"));
        assert_eq!(c.diff, DiffOptions::default());
        assert_eq!(c.level(), tracing::Level::WARN);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = CliConfig::from_toml(
            r#"
            log_level = "debug"

            [diff]
            max_depth = 2
            filter = ["differs", "equal"]
            "#,
        )
        .unwrap();
        assert_eq!(c.level(), tracing::Level::DEBUG);
        assert_eq!(c.state_path, PathBuf::from("pdoc-state.plist"));
        assert_eq!(c.diff.max_depth, 2);
        assert_eq!(
            c.diff.filter,
            ResultFilter::only([ChangeKind::Differs, ChangeKind::Equal])
        );
    }

    #[test]
    fn bad_level_falls_back() {
        let c = CliConfig {
            log_level: "chatty".into(),
            ..Default::default()
        };
        assert_eq!(c.level(), tracing::Level::WARN);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdoc.toml");
        fs::write(&path, "state_path = \"/var/lib/pdoc/state.plist\"\n").unwrap();
        let c = CliConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(c.state_path, PathBuf::from("/var/lib/pdoc/state.plist"));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = CliConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(c, CliConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdoc.toml");
        fs::write(&path, "log_level = [").unwrap();
        assert!(CliConfig::load(Some(path.as_path())).is_err());
    }
}
