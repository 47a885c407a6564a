//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Stores pages in memory. Use the builder methods to configure the mock
/// with test data, failing lookups and slow lookups.
///
/// # Example
///
/// ```ignore
/// use wk_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_page("Home", "** Welcome")
///     .with_failure("Ghost");
///
/// assert!(storage.exists("Home").unwrap());
/// assert!(storage.exists("Ghost").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    pages: RwLock<HashMap<String, String>>,
    failures: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
    exists_calls: AtomicUsize,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page with the given raw markup.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, page: impl Into<String>, content: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(page.into(), content.into());
        self
    }

    /// Make every lookup of `page` fail with an `Unavailable` error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, page: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(page.into());
        self
    }

    /// Delay every existence check of `page` by `delay`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_delay(self, page: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(page.into(), delay);
        self
    }

    /// Number of `exists()` calls served so far.
    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self, page: &str) -> Result<(), StorageError> {
        if self.failures.read().unwrap().contains(page) {
            return Err(StorageError::new(StorageErrorKind::Unavailable)
                .with_page(page)
                .with_backend("Mock"));
        }
        Ok(())
    }
}

impl Storage for MockStorage {
    fn read(&self, page: &str) -> Result<String, StorageError> {
        self.check_failure(page)?;
        self.pages
            .read()
            .unwrap()
            .get(page)
            .cloned()
            .ok_or_else(|| StorageError::not_found(page).with_backend("Mock"))
    }

    fn exists(&self, page: &str) -> Result<bool, StorageError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.read().unwrap().get(page).copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        self.check_failure(page)?;
        Ok(self.pages.read().unwrap().contains_key(page))
    }
}
