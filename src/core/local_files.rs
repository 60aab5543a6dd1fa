use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Entry returned from directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Filesystem primitives the tree renamer needs.
///
/// `rename` is a single-directory move and must never replace an existing
/// entry; callers check `exists` first.
pub trait FileSystem {
    /// Children of `dir`, sorted by name.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn rename(&mut self, from: &Path, to: &Path) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
        })?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
            })?;
            // Symlinks are listed as plain entries and never followed.
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            result.push(Entry {
                path: entry.path(),
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir,
            });
        }

        // read_dir handle is dropped here, before any rename in `dir`.
        result.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(result)
    }

    fn exists(&self, path: &Path) -> bool {
        // A dangling symlink still occupies its name.
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    fn rename(&mut self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|e| {
            Error::tidy_rename_failed(
                from.display().to_string(),
                to.display().to_string(),
                e.to_string(),
            )
        })
    }
}
