//! Local filesystem result store
//!
//! Keys are `/`-separated relative paths resolved under a root directory.
//! Absolute keys and `..` segments are rejected.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use super::ResultStore;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create storage root {}", root.display()))?;
        info!("Local storage at {}", root.display());
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty() {
            bail!("empty storage key");
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => bail!("storage key {key:?} escapes the storage root"),
            }
        }
        Ok(self.root.join(relative))
    }

    /// Read back a JSON document
    pub fn read_json(&self, key: &str) -> Result<serde_json::Value> {
        let path = self.resolve(key)?;
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
    }

    /// Files directly under `path`, as keys relative to the root, sorted
    pub fn list_files(&self, path: &str) -> Result<Vec<String>> {
        let dir = if path.is_empty() {
            self.root.clone()
        } else {
            self.resolve(path)?
        };
        let entries =
            fs::read_dir(&dir).with_context(|| format!("Failed to list {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(if path.is_empty() {
                name
            } else {
                format!("{}/{name}", path.trim_end_matches('/'))
            });
        }
        files.sort();
        Ok(files)
    }
}

impl ResultStore for LocalStorage {
    fn write_json(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(value)?;
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
