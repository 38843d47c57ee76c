//! File lookup abstraction used by command resolution.
//!
//! `DiskLookup` walks real directories; `MemoryLookup` serves a fixed set of
//! files so resolution can be exercised without touching the filesystem.

use prp_core::{AppError, AppResult};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Read-only view of the files under the search roots.
pub trait FileLookup {
    /// Whether `root` exists as a directory.
    fn is_dir(&self, root: &Path) -> bool;

    /// Whether `path` exists as a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Every regular file below `root`, recursively, in a stable order.
    fn list_files(&self, root: &Path) -> AppResult<Vec<PathBuf>>;

    /// Full text of the file at `path`.
    fn read_to_string(&self, path: &Path) -> AppResult<String>;
}

/// Lookup backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskLookup;

impl FileLookup for DiskLookup {
    fn is_dir(&self, root: &Path) -> bool {
        root.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_files(&self, root: &Path) -> AppResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in walkdir::WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable subtrees are skipped, matching `find`
                    tracing::debug!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> AppResult<String> {
        std::fs::read_to_string(path)
            .map_err(|e| AppError::Prompt(format!("Failed to read {:?}: {}", path, e)))
    }
}

/// In-memory lookup for tests.
///
/// Directories exist implicitly when a file lives below them, or explicitly
/// via [`MemoryLookup::with_dir`]. Every filesystem call is counted.
#[derive(Debug, Default)]
pub struct MemoryLookup {
    files: BTreeMap<PathBuf, String>,
    dirs: Vec<PathBuf>,
    calls: Cell<usize>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given contents.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Add an empty directory.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    /// Number of lookups performed so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn touch(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl FileLookup for MemoryLookup {
    fn is_dir(&self, root: &Path) -> bool {
        self.touch();
        self.dirs.iter().any(|d| d == root)
            || self.files.keys().any(|f| f.starts_with(root) && f != root)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.touch();
        self.files.contains_key(path)
    }

    fn list_files(&self, root: &Path) -> AppResult<Vec<PathBuf>> {
        self.touch();
        Ok(self
            .files
            .keys()
            .filter(|f| f.starts_with(root) && *f != root)
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> AppResult<String> {
        self.touch();
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::Prompt(format!("Failed to read {:?}: not found", path)))
    }
}
