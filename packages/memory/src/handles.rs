//! Locked and deferred handle implementations over the shared file table.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use devicefs_storage::{DeferredFile, LockedFile, StorageError, StoredFile};

use crate::storage::FileTable;

/// Exclusive read/write handle bound to one key of the file table.
///
/// "Locked" is nominal here: the table's mutex serializes individual
/// operations, but nothing stops two locked handles to the same key from
/// interleaving writes. Last write wins, as with the native storage.
pub struct MemoryLockedFile {
    path: String,
    files: FileTable,
}

impl MemoryLockedFile {
    pub(crate) fn new(path: impl Into<String>, files: FileTable) -> Self {
        Self {
            path: path.into(),
            files,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, crate::storage::Files>, StorageError> {
        self.files
            .lock()
            .map_err(|_| StorageError::backend("file table lock poisoned"))
    }
}

#[async_trait]
impl LockedFile for MemoryLockedFile {
    fn name(&self) -> &str {
        &self.path
    }

    async fn size(&self) -> Result<u64, StorageError> {
        let files = self.lock()?;
        match files.get(&self.path) {
            Some(entry) => Ok(entry.size()),
            None => Err(StorageError::NotFound {
                path: self.path.clone(),
            }),
        }
    }

    async fn read_at(&self, position: u64, length: usize) -> Result<Bytes, StorageError> {
        let files = self.lock()?;
        match files.get(&self.path) {
            Some(entry) => Ok(entry.slice(position, position.saturating_add(length as u64))),
            None => Err(StorageError::NotFound {
                path: self.path.clone(),
            }),
        }
    }

    async fn write(&self, data: Bytes) -> Result<(), StorageError> {
        let mut files = self.lock()?;
        // Whole-content replacement. A handle to a since-deleted entry
        // recreates it, keeping the old MIME type when one is known.
        let mime_type = files
            .get(&self.path)
            .map(|entry| entry.mime_type.clone())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        files.insert(
            self.path.clone(),
            StoredFile::new(self.path.clone(), mime_type, data),
        );
        Ok(())
    }

    async fn snapshot(&self) -> Result<StoredFile, StorageError> {
        let files = self.lock()?;
        files
            .get(&self.path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                path: self.path.clone(),
            })
    }
}

/// Deferred handle bound to one key of the file table.
pub struct MemoryDeferredFile {
    path: String,
    files: FileTable,
}

impl MemoryDeferredFile {
    pub(crate) fn new(path: impl Into<String>, files: FileTable) -> Self {
        Self {
            path: path.into(),
            files,
        }
    }
}

#[async_trait]
impl DeferredFile for MemoryDeferredFile {
    fn name(&self) -> &str {
        &self.path
    }

    fn open(&self) -> Result<Arc<dyn LockedFile>, StorageError> {
        Ok(Arc::new(MemoryLockedFile::new(
            self.path.clone(),
            self.files.clone(),
        )))
    }

    async fn get_file(&self) -> Result<StoredFile, StorageError> {
        let files = self
            .files
            .lock()
            .map_err(|_| StorageError::backend("file table lock poisoned"))?;
        files
            .get(&self.path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                path: self.path.clone(),
            })
    }
}
