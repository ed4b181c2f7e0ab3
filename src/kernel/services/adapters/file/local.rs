//! 本地文件系统 Provider
//!
//! 实现 FileProvider trait，操作本地文件系统

use crate::kernel::services::ports::file::{entry_order, DirEntry, FileError, FileProvider, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub struct LocalFileProvider;

impl LocalFileProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProvider for LocalFileProvider {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FileError::NotADirectory(path.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir() || entry.path().is_dir();
            entries.push(DirEntry::new(entry.path(), is_dir));
        }

        entries.sort_by(|a, b| entry_order(a.is_dir, &a.name, b.is_dir, &b.name));
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(fs::write(path, content)?)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(fs::canonicalize(path)?)
    }

    /// Walks the disk (hidden entries and ignore files included) in
    /// dirs-first, case-insensitive pre-order. Unreadable entries below the
    /// root are skipped.
    fn find_file(&self, root: &Path, file_name: &str) -> Result<Option<PathBuf>> {
        if !root.exists() {
            return Err(FileError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(FileError::NotADirectory(root.to_path_buf()));
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_path(|a, b| {
                let name = |p: &Path| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default()
                };
                entry_order(a.is_dir(), &name(a), b.is_dir(), &name(b))
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if is_file && entry.file_name() == file_name {
                return Ok(Some(entry.into_path()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
