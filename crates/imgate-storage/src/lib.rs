//! imgate storage library
//!
//! This crate provides the [`Storage`] abstraction and its backends: a flat
//! directory on local disk and an in-memory map.
//!
//! # Storage key format
//!
//! Keys are bare filenames such as `3f2a...c1.png` or `3f2a...c1_100x100.png`.
//! There are no directories: keys must not contain path separators, `..`, a
//! leading `.`, or control characters. Validation lives in the `keys` module so
//! all backends accept and reject exactly the same keys.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use imgate_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageError, StorageResult};
