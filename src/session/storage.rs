use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{SketchError, SketchResult};

/// String key/value data saved by scripts, optionally persisted as a JSON object.
#[derive(Clone, Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path` if it exists; later saves write back to it.
    pub fn open(path: &Path) -> SketchResult<Self> {
        let values = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read local data {}", path.display()))?;
            serde_json::from_str(&text).map_err(|e| {
                SketchError::serde(format!("invalid local data {}: {e}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Stored value for `key`, or `default` when missing or empty.
    pub fn read(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn save(&mut self, key: &str, value: &str) -> SketchResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| SketchError::serde(e.to_string()))?;
        std::fs::write(path, json)
            .with_context(|| format!("write local data {}", path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/storage.rs"]
mod tests;
