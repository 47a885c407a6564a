//! Page store abstraction for the wiki.
//!
//! This crate provides a [`Storage`] trait for reading raw page markup and
//! checking page existence independently of the underlying backend. This
//! enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (local directory today, anything readable tomorrow)
//! - **Clean separation** between rendering and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read()` and `exists()` methods
//! - [`FsStorage`] implementation for a flat directory of `<name>.txt` files
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use wk_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("pages"));
//! if storage.exists("Home")? {
//!     println!("{}", storage.read("Home")?);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::{DEFAULT_EXTENSION, FsStorage};
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
