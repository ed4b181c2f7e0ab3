//! Open file and open root directory.
//!
//! Storage is touched exactly twice per file: once when it is opened and once
//! per save. Content edits stay in memory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::kernel::content_kind::ContentKind;
use crate::kernel::services::ports::{FileError, FileProvider};

#[derive(Debug)]
pub enum WorkspaceError {
    Read { path: PathBuf, source: FileError },
    Write { path: PathBuf, source: FileError },
    /// `save()` without a path while nothing has been opened or saved yet.
    NoTargetPath,
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::Read { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            WorkspaceError::Write { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
            WorkspaceError::NoTargetPath => write!(f, "no file to save to"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkspaceError::Read { source, .. } | WorkspaceError::Write { source, .. } => {
                Some(source)
            }
            WorkspaceError::NoTargetPath => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    /// `None` for an untitled buffer that has never been saved.
    pub path: Option<PathBuf>,
    pub content: String,
    pub content_kind: ContentKind,
    pub dirty: bool,
}

impl WorkspaceFile {
    fn untitled() -> Self {
        Self {
            path: None,
            content: String::new(),
            content_kind: ContentKind::Plain,
            dirty: false,
        }
    }

    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub path: PathBuf,
    /// Set when saving to a new path moved the open root.
    pub new_root: Option<PathBuf>,
}

pub struct WorkspaceState {
    provider: Arc<dyn FileProvider>,
    file: Option<WorkspaceFile>,
    root: Option<PathBuf>,
}

impl WorkspaceState {
    pub fn new(provider: Arc<dyn FileProvider>) -> Self {
        Self {
            provider,
            file: None,
            root: None,
        }
    }

    pub fn provider(&self) -> &Arc<dyn FileProvider> {
        &self.provider
    }

    pub fn file(&self) -> Option<&WorkspaceFile> {
        self.file.as_ref()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, root: PathBuf) {
        self.root = Some(root);
    }

    pub fn content(&self) -> &str {
        self.file.as_ref().map(|f| f.content.as_str()).unwrap_or("")
    }

    pub fn content_kind(&self) -> ContentKind {
        self.file
            .as_ref()
            .map(|f| f.content_kind)
            .unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.file.as_ref().is_some_and(|f| f.dirty)
    }

    /// Reads `path` and makes it the open file. On failure the previously
    /// open file is left as it was.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        let content = self
            .provider
            .read_file(path)
            .map_err(|source| WorkspaceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let path = self
            .provider
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf());

        tracing::debug!(path = %path.display(), bytes = content.len(), "file opened");
        self.file = Some(WorkspaceFile {
            content_kind: ContentKind::from_path(&path),
            path: Some(path),
            content,
            dirty: false,
        });
        Ok(())
    }

    pub fn set_content(&mut self, text: impl Into<String>) {
        let file = self.file.get_or_insert_with(WorkspaceFile::untitled);
        file.content = text.into();
        file.dirty = true;
    }

    /// Manual override of the detected kind; the next `open_file` replaces it.
    pub fn set_content_kind(&mut self, kind: ContentKind) {
        self.file
            .get_or_insert_with(WorkspaceFile::untitled)
            .content_kind = kind;
    }

    /// Writes the current content to `path`, or to the open file's path.
    pub fn save(&mut self, path: Option<&Path>) -> Result<Saved> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .file
                .as_ref()
                .and_then(|f| f.path.clone())
                .ok_or(WorkspaceError::NoTargetPath)?,
        };

        self.provider
            .write_file(&target, self.content())
            .map_err(|source| WorkspaceError::Write {
                path: target.clone(),
                source,
            })?;

        let file = self.file.get_or_insert_with(WorkspaceFile::untitled);
        file.dirty = false;

        let mut new_root = None;
        if path.is_some() {
            file.path = Some(target.clone());
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                let parent = parent.to_path_buf();
                if self.root.as_ref() != Some(&parent) {
                    new_root = Some(parent.clone());
                }
                self.root = Some(parent);
            }
        }

        tracing::debug!(path = %target.display(), "file saved");
        Ok(Saved {
            path: target,
            new_root,
        })
    }

    /// Replaces content with a remote result. Same as an edit: dirty, no IO.
    pub fn apply_remote_content(&mut self, content: String) {
        self.set_content(content);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace.rs"]
mod tests;
