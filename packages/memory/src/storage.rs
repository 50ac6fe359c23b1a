//! In-memory device storage over a sorted file table.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use devicefs_storage::{
    DeviceStorage, FileHandle, StorageCursor, StorageError, StoredFile,
};
use log::debug;

use crate::handles::{MemoryDeferredFile, MemoryLockedFile};

pub(crate) type Files = BTreeMap<String, StoredFile>;
pub(crate) type FileTable = Arc<Mutex<Files>>;

/// Which handle shape lookups should yield.
///
/// A native storage decides this on its own; the in-memory backend makes
/// it a knob so every normalization path in the adapter can be exercised
/// without a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleShape {
    /// `get` yields immutable snapshots (the common native behavior).
    #[default]
    Snapshot,
    /// `get` yields locked handles.
    Locked,
    /// `get` and `get_editable` yield deferred handles.
    Deferred,
}

/// An in-memory storage pool.
///
/// One instance stands in for one storage type. The file table is a map
/// from relative path to entry; keys are unique and kept in lexicographic
/// order, which is also the enumeration order. Note this is a flat string
/// sort - multi-level hierarchies sort as plain strings, not by segment.
///
/// Cloning is cheap and shares the file table, so a clone handed out as a
/// handle origin observes the same entries.
///
/// # Example
///
/// ```rust,ignore
/// use devicefs_memory::MemoryStorage;
/// use devicefs_storage::{DeviceStorage, StoredFile, Bytes};
///
/// let storage = MemoryStorage::new("sdcard");
/// storage.add_named(
///     StoredFile::new("", "text/plain", Bytes::from_static(b"hi")),
///     "notes/a.txt",
/// ).await?;
/// assert!(storage.contains("notes/a.txt"));
/// ```
#[derive(Clone)]
pub struct MemoryStorage {
    storage_type: String,
    shape: HandleShape,
    files: FileTable,
}

impl MemoryStorage {
    /// Create an empty pool for the given storage type.
    pub fn new(storage_type: impl Into<String>) -> Self {
        Self {
            storage_type: storage_type.into(),
            shape: HandleShape::default(),
            files: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Create a pool whose lookups yield the given handle shape.
    pub fn with_shape(storage_type: impl Into<String>, shape: HandleShape) -> Self {
        Self {
            shape,
            ..Self::new(storage_type)
        }
    }

    /// The storage type this pool answers for.
    pub fn storage_type(&self) -> &str {
        &self.storage_type
    }

    /// Direct key-presence check, bypassing the open machinery.
    pub fn contains(&self, path: &str) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    /// Whether the pool holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Files>, StorageError> {
        self.files
            .lock()
            .map_err(|_| StorageError::backend("file table lock poisoned"))
    }

    fn handle_for(&self, path: &str, entry: &StoredFile, shape: HandleShape) -> FileHandle {
        match shape {
            HandleShape::Snapshot => FileHandle::Snapshot {
                file: entry.clone(),
                origin: Arc::new(self.clone()),
            },
            HandleShape::Locked => {
                FileHandle::Locked(Arc::new(MemoryLockedFile::new(path, self.files.clone())))
            }
            HandleShape::Deferred => {
                FileHandle::Deferred(Arc::new(MemoryDeferredFile::new(path, self.files.clone())))
            }
        }
    }
}

#[async_trait]
impl DeviceStorage for MemoryStorage {
    async fn get(&self, path: &str) -> Result<FileHandle, StorageError> {
        let files = self.lock()?;
        match files.get(path) {
            Some(entry) => Ok(self.handle_for(path, entry, self.shape)),
            None => Err(StorageError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    async fn get_editable(&self, path: &str) -> Result<FileHandle, StorageError> {
        let files = self.lock()?;
        let entry = files.get(path).ok_or_else(|| StorageError::NotFound {
            path: path.to_string(),
        })?;
        // Editable lookups never yield a read-only snapshot.
        let shape = match self.shape {
            HandleShape::Deferred => HandleShape::Deferred,
            _ => HandleShape::Locked,
        };
        Ok(self.handle_for(path, entry, shape))
    }

    async fn enumerate(&self, prefix: &str) -> Result<Box<dyn StorageCursor>, StorageError> {
        let files = self.lock()?;
        // BTreeMap iteration is already a flat lexicographic sort of keys.
        let entries: VecDeque<StoredFile> = files
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(_, entry)| entry.clone())
            .collect();
        Ok(Box::new(MemoryCursor { entries }))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let mut files = self.lock()?;
        if files.remove(path).is_none() {
            debug!("{}: delete of missing '{}' is a no-op", self.storage_type, path);
        }
        Ok(())
    }

    async fn add_named(&self, blob: StoredFile, path: &str) -> Result<(), StorageError> {
        let mut files = self.lock()?;
        debug!("{}: add_named '{}' ({} bytes)", self.storage_type, path, blob.data.len());
        // Unconditional overwrite: no distinct create-vs-replace path.
        files.insert(
            path.to_string(),
            StoredFile::new(path, blob.mime_type, blob.data),
        );
        Ok(())
    }
}

/// Cursor over a pre-sorted snapshot of matching entries.
struct MemoryCursor {
    entries: VecDeque<StoredFile>,
}

#[async_trait]
impl StorageCursor for MemoryCursor {
    async fn advance(&mut self) -> Result<Option<StoredFile>, StorageError> {
        Ok(self.entries.pop_front())
    }
}
