//! File handles in their three capability shapes.
//!
//! A storage backend may answer an open with any of three handle shapes:
//! an exclusively locked file, an immutable snapshot, or a deferred handle
//! that has to be opened (for writing) or materialized (for reading) before
//! use. `FileHandle` models the three shapes as one tagged union so that
//! callers can match exhaustively instead of sniffing types.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::StorageError;

/// An immutable file snapshot.
///
/// This is the plain data object a backend hands out for reads: name,
/// MIME type, modification stamp and the full payload. Overwrites replace
/// snapshots wholesale; a held snapshot never observes later writes.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Path of the entry within its storage.
    pub name: String,
    /// MIME type recorded at insertion time.
    pub mime_type: String,
    /// Last modification stamp.
    pub last_modified: DateTime<Utc>,
    /// Full payload.
    pub data: Bytes,
}

impl StoredFile {
    /// Create a snapshot stamped with the current time.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified: Utc::now(),
            data,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// A sub-range of the payload, clamped to the payload's bounds.
    ///
    /// Never slices past end-of-file: both ends are clamped to `size()`,
    /// and an inverted range yields an empty slice.
    pub fn slice(&self, from: u64, to: u64) -> Bytes {
        let len = self.data.len() as u64;
        let from = from.min(len) as usize;
        let to = to.min(len) as usize;
        if from >= to {
            return Bytes::new();
        }
        self.data.slice(from..to)
    }

    /// The payload decoded as UTF-8 text, lossily.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// The payload as a binary string: one char per byte, values 0-255.
    pub fn binary_string(&self) -> String {
        self.data.iter().map(|&b| b as char).collect()
    }

    /// The payload as a `data:` URL with a base64 payload.
    pub fn data_url(&self) -> String {
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("data:{};base64,{}", self.mime_type, payload)
    }
}

/// A file opened for exclusive read/write.
///
/// # Object Safety
///
/// This trait is object-safe: handles travel as `Arc<dyn LockedFile>`.
#[async_trait]
pub trait LockedFile: Send + Sync {
    /// Path of the entry within its storage.
    fn name(&self) -> &str;

    /// Current size of the entry in bytes.
    async fn size(&self) -> Result<u64, StorageError>;

    /// Read up to `length` bytes starting at `position`.
    ///
    /// Reads past end-of-file are clamped; a read entirely past the end
    /// returns an empty buffer, not an error.
    async fn read_at(&self, position: u64, length: usize) -> Result<Bytes, StorageError>;

    /// Replace the entry's content with `data`.
    ///
    /// This is whole-content replacement: the previous payload is gone
    /// after a successful write, never appended to.
    async fn write(&self, data: Bytes) -> Result<(), StorageError>;

    /// Materialize the current content as a snapshot.
    async fn snapshot(&self) -> Result<StoredFile, StorageError>;
}

/// A handle that must be opened or materialized before use.
///
/// # Object Safety
///
/// This trait is object-safe: handles travel as `Arc<dyn DeferredFile>`.
#[async_trait]
pub trait DeferredFile: Send + Sync {
    /// Path of the entry within its storage.
    fn name(&self) -> &str;

    /// Open the handle for writing, synchronously.
    fn open(&self) -> Result<Arc<dyn LockedFile>, StorageError>;

    /// Materialize the underlying file for reading.
    async fn get_file(&self) -> Result<StoredFile, StorageError>;
}

/// The three handle shapes a storage backend can yield.
///
/// The adapter normalizes every shape to a single read/write contract:
///
/// | shape      | read                        | write                        |
/// |------------|-----------------------------|------------------------------|
/// | `Locked`   | used as-is                  | used as-is                   |
/// | `Snapshot` | used as-is                  | re-opened by name, writable  |
/// | `Deferred` | materialized via `get_file` | opened via `open`            |
#[derive(Clone)]
pub enum FileHandle {
    /// Already opened for exclusive read/write.
    Locked(Arc<dyn LockedFile>),
    /// Read-only snapshot, together with the storage it came from so a
    /// write can re-open the entry by name.
    Snapshot {
        file: StoredFile,
        origin: Arc<dyn crate::DeviceStorage>,
    },
    /// Must be explicitly opened (write) or materialized (read).
    Deferred(Arc<dyn DeferredFile>),
}

impl FileHandle {
    /// Path of the entry within its storage, regardless of shape.
    pub fn name(&self) -> &str {
        match self {
            FileHandle::Locked(locked) => locked.name(),
            FileHandle::Snapshot { file, .. } => &file.name,
            FileHandle::Deferred(deferred) => deferred.name(),
        }
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileHandle::Locked(locked) => {
                f.debug_tuple("Locked").field(&locked.name()).finish()
            }
            FileHandle::Snapshot { file, .. } => {
                f.debug_tuple("Snapshot").field(&file.name).finish()
            }
            FileHandle::Deferred(deferred) => {
                f.debug_tuple("Deferred").field(&deferred.name()).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(data: &'static [u8]) -> StoredFile {
        StoredFile::new("notes/a.txt", "text/plain", Bytes::from_static(data))
    }

    #[test]
    fn slice_clamps_to_size() {
        let f = file(b"hello world");

        assert_eq!(f.slice(0, 5), Bytes::from_static(b"hello"));
        assert_eq!(f.slice(6, 100), Bytes::from_static(b"world"));
        assert_eq!(f.slice(100, 200), Bytes::new());
        // Inverted range is empty, not a panic.
        assert_eq!(f.slice(5, 2), Bytes::new());
    }

    #[test]
    fn text_and_binary_views() {
        let f = file(b"hi");
        assert_eq!(f.text_lossy(), "hi");
        assert_eq!(f.binary_string(), "hi");

        // Non-UTF-8 bytes: text is lossy, binary string is byte-per-char.
        let f = StoredFile::new("bin", "application/octet-stream", Bytes::from_static(&[0xff, 0x41]));
        assert_eq!(f.text_lossy(), "\u{fffd}A");
        assert_eq!(f.binary_string(), "\u{ff}A");
    }

    #[test]
    fn data_url_view() {
        let f = file(b"hello");
        assert_eq!(f.data_url(), "data:text/plain;base64,aGVsbG8=");
    }

    #[test]
    fn size_tracks_payload() {
        assert_eq!(file(b"hello").size(), 5);
        assert_eq!(file(b"").size(), 0);
    }
}
