pub mod base;
pub mod disk;

pub use base::{StorageBackend, StorageCategory, StorageError};
pub use disk::DiskStorage;
