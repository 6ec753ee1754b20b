use crate::core::standards::StandardsTables;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CATALOG_ROOT_VAR: &str = "BEICALC_CATALOG_ROOT";
pub const CATALOG_PATH_VAR: &str = "BEICALC_CATALOG_PATH";
pub const STANDARDS_PATH_VAR: &str = "BEICALC_STANDARDS_PATH";

pub const DEFAULT_CATALOG_PATH: &str = "data/bei/standard_intensities.yaml";

/// Where the engine finds the data it does not compile in.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// directory that relative data paths are resolved against
    pub catalog_root: PathBuf,
    /// standard intensity catalog (YAML)
    pub catalog_path: PathBuf,
    /// substitute standards tables (JSON); the built-in tables are used when absent
    pub standards_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_root: PathBuf::from("."),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            standards_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open config file '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse config file '{}'", path.display()))
    }

    /// Apply any overrides set in the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(root) = non_empty(CATALOG_ROOT_VAR) {
            self.catalog_root = root.into();
        }
        if let Some(path) = non_empty(CATALOG_PATH_VAR) {
            self.catalog_path = path.into();
        }
        if let Some(path) = non_empty(STANDARDS_PATH_VAR) {
            self.standards_path = Some(path.into());
        }

        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.catalog_root.join(path)
        }
    }

    pub fn resolved_catalog_path(&self) -> PathBuf {
        self.resolve(&self.catalog_path)
    }

    pub fn resolved_standards_path(&self) -> Option<PathBuf> {
        self.standards_path.as_deref().map(|path| self.resolve(path))
    }

    /// The standards tables to calculate with: the substitute file if configured, or else
    /// the built-in tables.
    pub fn load_standards_tables(&self) -> anyhow::Result<StandardsTables> {
        match self.resolved_standards_path() {
            Some(path) => {
                debug!(path = %path.display(), "loading substitute standards tables");
                let file = File::open(&path).with_context(|| {
                    format!("Could not open standards tables '{}'", path.display())
                })?;
                StandardsTables::from_json(BufReader::new(file)).with_context(|| {
                    format!("Could not parse standards tables '{}'", path.display())
                })
            }
            None => Ok(StandardsTables::default()),
        }
    }
}
