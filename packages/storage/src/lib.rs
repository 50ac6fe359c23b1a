//! Device storage capability layer.
//!
//! This crate defines the asynchronous capability surface a device storage
//! backend exposes, without any path semantics:
//! - `DeviceStorage`: lookup, editable lookup, cursor-based enumeration,
//!   deletion, named insertion
//! - `FileHandle`: the three handle shapes a lookup can yield (locked,
//!   snapshot, deferred)
//! - `StoredFile`: an immutable snapshot with format views
//! - `StorageResolver`: strategy mapping storage type names to backends
//!
//! The `devicefs` crate layers an fs-like API on top; `devicefs-memory`
//! implements this surface in memory for running without a device.

pub use bytes::Bytes;

mod error;
mod handle;
mod traits;

pub use error::StorageError;
pub use handle::{DeferredFile, FileHandle, LockedFile, StoredFile};
pub use traits::{DeviceStorage, StorageCursor, StorageResolver};
