use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::RuleSet;

/// External persistence for rule overrides.
pub trait RuleStore: Send + Sync {
    /// Returns `None` when no overrides have been saved.
    fn load(&self) -> Result<Option<RuleSet>, RuleStoreError>;
    fn save(&self, rules: &RuleSet) -> Result<(), RuleStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RuleStoreError {
    #[error("rule store io failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rule store document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("rule store unavailable: {0}")]
    Unavailable(String),
}

/// Keeps the rule set as a pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileRuleStore {
    path: PathBuf,
}

impl JsonFileRuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RuleStoreError {
        RuleStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RuleStore for JsonFileRuleStore {
    fn load(&self) -> Result<Option<RuleSet>, RuleStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let rules = serde_json::from_str(&raw)?;
        Ok(Some(rules))
    }

    fn save(&self, rules: &RuleSet) -> Result<(), RuleStoreError> {
        let document = serde_json::to_string_pretty(rules)?;
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, document).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }
}
