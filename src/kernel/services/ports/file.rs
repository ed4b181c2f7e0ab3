//! Local storage contract.
//!
//! Everything the workspace reads from or writes to disk goes through a
//! [`FileProvider`], so the tree and the workspace state can be driven by an
//! in-memory provider in tests.

use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug)]
pub enum FileError {
    NotFound(PathBuf),
    NotAFile(PathBuf),
    NotADirectory(PathBuf),
    Io(io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound(path) => write!(f, "not found: {}", path.display()),
            FileError::NotAFile(path) => write!(f, "not a file: {}", path.display()),
            FileError::NotADirectory(path) => write!(f, "not a directory: {}", path.display()),
            FileError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        FileError::Io(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            path,
            is_dir,
        }
    }
}

/// Minimal listing entry handed from a worker back to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

/// Directories first, then case-insensitive name order.
///
/// Names equal ignoring case fall back to their raw ordering so the result is
/// total and stable across platforms.
pub fn entry_order(a_is_dir: bool, a_name: &str, b_is_dir: bool, b_name: &str) -> Ordering {
    match (a_is_dir, b_is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a_name
            .to_lowercase()
            .cmp(&b_name.to_lowercase())
            .then_with(|| a_name.cmp(b_name)),
    }
}

pub trait FileProvider: Send + Sync {
    /// Immediate children of `path`, in [`entry_order`].
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    fn read_file(&self, path: &Path) -> Result<String>;

    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// First file named `file_name` under `root`, depth-first pre-order,
    /// siblings visited in [`entry_order`]. Hidden entries are not skipped.
    ///
    /// Only a failure to list `root` itself is an error. Subdirectories that
    /// cannot be listed are skipped and the walk goes on.
    fn find_file(&self, root: &Path, file_name: &str) -> Result<Option<PathBuf>> {
        let entries = self.read_dir(root)?;
        Ok(find_in_entries(self, entries, file_name))
    }
}

fn find_in_entries<P: FileProvider + ?Sized>(
    provider: &P,
    entries: Vec<DirEntry>,
    file_name: &str,
) -> Option<PathBuf> {
    for entry in entries {
        if !entry.is_dir {
            if entry.name == file_name {
                return Some(entry.path);
            }
            continue;
        }
        match provider.read_dir(&entry.path) {
            Ok(children) => {
                if let Some(found) = find_in_entries(provider, children, file_name) {
                    return Some(found);
                }
            }
            Err(e) => {
                tracing::debug!(path = %entry.path.display(), error = %e, "skipping unreadable directory");
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;
