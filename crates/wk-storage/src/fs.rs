//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading pages from a flat directory of
//! plain-text files, one file per page (`pages/<name>.txt`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Default page file extension.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Filesystem storage implementation.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use wk_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("pages"));
/// let text = storage.read("Home")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Directory holding one file per page.
    pages_dir: PathBuf,
    /// File extension without the leading dot.
    extension: String,
}

impl FsStorage {
    /// Create a new filesystem storage using the default `txt` extension.
    #[must_use]
    pub fn new(pages_dir: PathBuf) -> Self {
        Self::with_extension(pages_dir, DEFAULT_EXTENSION)
    }

    /// Create a new filesystem storage with a custom page file extension.
    #[must_use]
    pub fn with_extension(pages_dir: PathBuf, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            pages_dir,
            extension: extension.trim_start_matches('.').to_owned(),
        }
    }

    /// Directory holding the page files.
    #[must_use]
    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// File name a page is stored under (e.g. `Home.txt`).
    #[must_use]
    pub fn file_name(&self, page: &str) -> String {
        format!("{page}.{}", self.extension)
    }

    /// Validate that a page name maps to a file inside the pages directory.
    ///
    /// Rejects names that could escape the directory (a `..` component,
    /// absolute paths, separators other than `/`) and names containing NUL.
    /// Dots elsewhere in a name are fine.
    fn validate_page(page: &str) -> Result<(), StorageError> {
        if page.split('/').any(|component| component == "..")
            || page.starts_with('/')
            || page.contains(['\\', '\0'])
        {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_page(page)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve page name to its file path.
    fn resolve(&self, page: &str) -> Result<PathBuf, StorageError> {
        Self::validate_page(page)?;
        Ok(self.pages_dir.join(self.file_name(page)))
    }
}

impl Storage for FsStorage {
    fn read(&self, page: &str) -> Result<String, StorageError> {
        let path = self.resolve(page)?;
        tracing::debug!(page, path = %path.display(), "Reading page");
        fs::read_to_string(&path)
            .map_err(|e| StorageError::io(e, Some(page)).with_backend(BACKEND))
    }

    fn exists(&self, page: &str) -> Result<bool, StorageError> {
        let path = self.resolve(page)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(e, Some(page)).with_backend(BACKEND)),
        }
    }
}
