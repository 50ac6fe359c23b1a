//! Capability traits for device storage.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{FileHandle, StorageError, StoredFile};

/// A cursor over enumerated storage entries.
///
/// Repeated `advance` calls yield the next entry until the cursor signals
/// completion with `Ok(None)`. A cursor that fails mid-enumeration ends the
/// walk; callers decide what to do with the entries seen so far.
///
/// # Object Safety
///
/// This trait is object-safe: cursors travel as `Box<dyn StorageCursor>`.
#[async_trait]
pub trait StorageCursor: Send {
    /// Advance to the next entry.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(file))` - The next entry.
    /// * `Ok(None)` - Enumeration is complete.
    /// * `Err(StorageError)` - Enumeration failed; the cursor is dead.
    async fn advance(&mut self) -> Result<Option<StoredFile>, StorageError>;
}

/// The device storage capability surface.
///
/// One instance backs one storage pool (one storage type). Every operation
/// is asynchronous; completion order between independent operations is not
/// specified. Paths are relative to the pool - storage-type prefixes are an
/// adapter-level concept.
///
/// # Object Safety
///
/// This trait is object-safe: backends travel as `Arc<dyn DeviceStorage>`.
#[async_trait]
pub trait DeviceStorage: Send + Sync {
    /// Look up an entry for reading.
    ///
    /// The shape of the returned handle is backend-defined; callers must
    /// accept any `FileHandle` variant.
    async fn get(&self, path: &str) -> Result<FileHandle, StorageError>;

    /// Look up an entry for writing.
    ///
    /// The returned handle is writable after normalization: `Locked`
    /// directly, `Deferred` after its synchronous `open`.
    async fn get_editable(&self, path: &str) -> Result<FileHandle, StorageError>;

    /// Enumerate entries whose path starts with `prefix`.
    async fn enumerate(&self, prefix: &str) -> Result<Box<dyn StorageCursor>, StorageError>;

    /// Delete the entry at `path`.
    ///
    /// Whether deleting a missing entry is an error is backend-defined;
    /// the in-memory backend treats it as a no-op.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Insert `blob` as a new entry under `path`.
    ///
    /// The in-memory backend overwrites an existing entry unconditionally.
    /// Backends wrapping a native store may instead fail with
    /// [`StorageError::AlreadyExists`].
    async fn add_named(&self, blob: StoredFile, path: &str) -> Result<(), StorageError>;
}

/// Strategy for resolving a storage type name to a backend.
///
/// This is the seam between the adapter and the storage subsystem: the
/// adapter asks the resolver once per call, never caching the result.
/// Swapping the resolver swaps the whole backend - the in-memory resolver
/// stands in for a device during tests.
pub trait StorageResolver: Send + Sync {
    /// Resolve a storage type to its backing store, if one exists.
    fn resolve(&self, storage_type: &str) -> Option<Arc<dyn DeviceStorage>>;
}
