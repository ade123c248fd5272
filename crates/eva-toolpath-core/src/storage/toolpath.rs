//! Toolpath file storage.
//!
//! One pretty-printed JSON file per toolpath, named `<name>.json`, in a flat
//! directory.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tokio::fs;

use crate::error::StorageError;
use crate::types::{LocalToolpathInfo, Toolpath};

/// Characters that would let a toolpath name escape the backup directory.
const INVALID_NAME_PATTERN: &str = r"[/\\\x00]";

const INDENT: &[u8] = b"    ";

/// Directory-backed toolpath store.
pub struct ToolpathStorage {
    dir: PathBuf,
    invalid_chars: Regex,
}

impl ToolpathStorage {
    /// Create a store over `dir`. The directory is not touched until used.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            invalid_chars: Regex::new(INVALID_NAME_PATTERN).expect("name pattern is valid"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        if fs::metadata(&self.dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Ok(());
        }

        tracing::info!(dir = %self.dir.display(), "creating backup directory");
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::DirectoryAccess(format!("{}: {}", self.dir.display(), e)))
    }

    pub fn validate_name(&self, name: &str) -> Result<(), StorageError> {
        if name.is_empty() {
            return Err(StorageError::InvalidName(
                "Name cannot be empty".to_string(),
            ));
        }

        if name == "." || name == ".." {
            return Err(StorageError::InvalidName(format!(
                "Name '{}' is reserved",
                name
            )));
        }

        if self.invalid_chars.is_match(name) {
            return Err(StorageError::InvalidName(format!(
                "Name '{}' contains a path separator or NUL and cannot be used as a file name",
                name
            )));
        }

        Ok(())
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Write a toolpath to `<dir>/<name>.json`, replacing any previous file.
    pub async fn save(&self, toolpath: &Toolpath) -> Result<PathBuf, StorageError> {
        self.validate_name(&toolpath.name)?;

        let path = self.path_for(&toolpath.name);
        let content = to_pretty_json(toolpath)?;

        fs::write(&path, content).await?;

        Ok(path)
    }

    /// List toolpath files in the directory, sorted by name.
    pub async fn list(&self) -> Result<Vec<LocalToolpathInfo>, StorageError> {
        let mut toolpaths = Vec::new();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StorageError::DirectoryAccess(format!("{}: {}", self.dir.display(), e)))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };

            let metadata = fs::metadata(&path).await?;
            if !metadata.is_file() {
                continue;
            }

            let updated_at = metadata
                .modified()
                .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339())
                .unwrap_or_default();

            toolpaths.push(LocalToolpathInfo {
                name,
                path: path.display().to_string(),
                updated_at,
            });
        }

        toolpaths.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(toolpaths)
    }

    /// Read one toolpath file. The file must hold a JSON object with at least
    /// `name` and `toolpath`.
    pub async fn read(&self, path: &Path) -> Result<Toolpath, StorageError> {
        let content = fs::read_to_string(path).await?;

        serde_json::from_str(&content).map_err(|e| StorageError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Serialize with the 4-space indent used for backup files.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}
