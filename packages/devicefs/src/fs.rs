//! The `DeviceFs` adapter: an fs-like surface over device storage.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use devicefs_storage::{
    DeviceStorage, FileHandle, LockedFile, StorageError, StorageResolver, StoredFile,
};
use log::{debug, warn};

use crate::{
    Content, ContentFormat, Error, OpenMode, ReadOptions, StoragePath, WriteBuffer, WriteOptions,
};

/// Asynchronous file operations over a storage resolver.
///
/// `DeviceFs` presents one read/write contract no matter which handle
/// shape the underlying storage yields. The resolver is the swappable
/// seam: hand in the native subsystem's resolver or an in-memory one
/// (`devicefs_memory::MemoryResolver`) - the operations behave the same.
///
/// Storage is resolved per call from the path's type prefix, never
/// cached.
///
/// # Example
///
/// ```rust,ignore
/// use devicefs::{DeviceFs, WriteOptions, ReadOptions};
/// use devicefs_memory::MemoryResolver;
///
/// let fs = DeviceFs::with_resolver(MemoryResolver::with_types(["sdcard"]));
/// fs.write_file("sdcard:notes/a.txt", "hello", &WriteOptions::default()).await?;
/// let content = fs.read_file("sdcard:notes/a.txt", &ReadOptions::default()).await?;
/// assert_eq!(content.as_text(), Some("hello"));
/// ```
pub struct DeviceFs {
    resolver: Arc<dyn StorageResolver>,
}

/// A handle normalized for reading: either still locked or a snapshot.
enum ReadSource {
    Locked(Arc<dyn LockedFile>),
    Snapshot(StoredFile),
}

impl ReadSource {
    async fn size(&self) -> Result<u64, StorageError> {
        match self {
            ReadSource::Locked(locked) => locked.size().await,
            ReadSource::Snapshot(file) => Ok(file.size()),
        }
    }

    async fn read_range(&self, position: u64, length: usize) -> Result<Bytes, StorageError> {
        match self {
            ReadSource::Locked(locked) => locked.read_at(position, length).await,
            ReadSource::Snapshot(file) => {
                Ok(file.slice(position, position.saturating_add(length as u64)))
            }
        }
    }

    async fn materialize(self) -> Result<StoredFile, StorageError> {
        match self {
            ReadSource::Locked(locked) => locked.snapshot().await,
            ReadSource::Snapshot(file) => Ok(file),
        }
    }
}

impl DeviceFs {
    /// Build an adapter over the given resolver.
    pub fn new(resolver: Arc<dyn StorageResolver>) -> Self {
        Self { resolver }
    }

    /// Convenience constructor taking the resolver by value.
    pub fn with_resolver<R: StorageResolver + 'static>(resolver: R) -> Self {
        Self::new(Arc::new(resolver))
    }

    fn storage_for(&self, path: &StoragePath) -> Result<Arc<dyn DeviceStorage>, Error> {
        let storage = path
            .storage_type
            .as_deref()
            .and_then(|storage_type| self.resolver.resolve(storage_type));
        match storage {
            Some(storage) => Ok(storage),
            None => {
                warn!("no storage resolves for '{}'", path);
                Err(Error::StorageNotFound {
                    path: path.to_string(),
                })
            }
        }
    }

    /// Open a path for reading or writing.
    ///
    /// The returned handle may be any of the three shapes; `read`, `write`
    /// and the whole-file operations normalize it internally.
    pub async fn open(&self, path: &str, mode: OpenMode) -> Result<FileHandle, Error> {
        let parsed = StoragePath::parse(path);
        let storage = self.storage_for(&parsed)?;
        let handle = match mode {
            OpenMode::Read => storage.get(&parsed.relative).await?,
            OpenMode::Write => storage.get_editable(&parsed.relative).await?,
        };
        Ok(handle)
    }

    /// Whether a path currently opens for reading.
    ///
    /// Any open failure - missing entry, unresolvable storage - reports
    /// `false`; this never returns an error.
    pub async fn exists(&self, path: &str) -> Result<bool, Error> {
        Ok(self.open(path, OpenMode::Read).await.is_ok())
    }

    async fn resolve_for_read(&self, handle: FileHandle) -> Result<ReadSource, Error> {
        match handle {
            FileHandle::Locked(locked) => Ok(ReadSource::Locked(locked)),
            FileHandle::Snapshot { file, .. } => Ok(ReadSource::Snapshot(file)),
            FileHandle::Deferred(deferred) => {
                Ok(ReadSource::Snapshot(deferred.get_file().await?))
            }
        }
    }

    async fn resolve_for_write(&self, handle: FileHandle) -> Result<Arc<dyn LockedFile>, Error> {
        match handle {
            FileHandle::Locked(locked) => Ok(locked),
            FileHandle::Deferred(deferred) => {
                deferred.open().map_err(|e| Error::InvalidHandle {
                    message: format!("deferred handle failed to open: {}", e),
                })
            }
            FileHandle::Snapshot { file, origin } => {
                // Trade the read-only snapshot for an editable handle by
                // re-opening its name in write mode.
                match origin.get_editable(&file.name).await? {
                    FileHandle::Locked(locked) => Ok(locked),
                    FileHandle::Deferred(deferred) => {
                        deferred.open().map_err(|e| Error::InvalidHandle {
                            message: format!("deferred handle failed to open: {}", e),
                        })
                    }
                    FileHandle::Snapshot { .. } => Err(Error::InvalidHandle {
                        message: format!(
                            "storage returned a read-only handle for '{}' in write mode",
                            file.name
                        ),
                    }),
                }
            }
        }
    }

    /// Read a byte range from a handle into `sink`.
    ///
    /// `position` addresses the file, `offset` the sink. `length` defaults
    /// to everything after `position` and is clamped so the read never runs
    /// past end-of-file. The sink grows as needed; bytes between its old
    /// end and `offset` are zero-filled. Returns the number of bytes read.
    pub async fn read(
        &self,
        handle: FileHandle,
        sink: &mut BytesMut,
        offset: usize,
        length: Option<usize>,
        position: u64,
    ) -> Result<usize, Error> {
        let source = self.resolve_for_read(handle).await?;
        let size = source.size().await?;
        let available = size.saturating_sub(position) as usize;
        let count = length.unwrap_or(available).min(available);
        let data = source.read_range(position, count).await?;

        let end = offset.saturating_add(data.len());
        if sink.len() < end {
            sink.resize(end, 0);
        }
        sink[offset..end].copy_from_slice(&data);
        Ok(data.len())
    }

    /// Write a byte range from `buffer` through a handle.
    ///
    /// `length` defaults to the whole buffer and is clamped so the slice
    /// never runs past the buffer's end. The capability's write replaces
    /// the entry's content wholesale; `position` is accepted for signature
    /// parity with `read` and does not offset the write. Returns the number
    /// of bytes written.
    pub async fn write(
        &self,
        handle: FileHandle,
        buffer: &WriteBuffer,
        offset: usize,
        length: Option<usize>,
        _position: u64,
    ) -> Result<usize, Error> {
        let locked = self.resolve_for_write(handle).await?;
        let count = length.unwrap_or(buffer.len());
        let data = buffer.slice(offset, count)?;
        let written = data.len();
        locked.write(data).await?;
        Ok(written)
    }

    /// Read a whole file, materialized in the requested format.
    pub async fn read_file(&self, path: &str, options: &ReadOptions) -> Result<Content, Error> {
        let handle = self.open(path, options.flag).await?;
        let source = self.resolve_for_read(handle).await?;
        let file = source.materialize().await?;

        if options.format == ContentFormat::Text && !is_utf8(&options.encoding) {
            debug!(
                "encoding '{}' is not supported; decoding '{}' as UTF-8",
                options.encoding, path
            );
        }

        Ok(match options.format {
            ContentFormat::Text => Content::Text(file.text_lossy()),
            ContentFormat::Binary => Content::Binary(file.binary_string()),
            ContentFormat::DataUrl => Content::DataUrl(file.data_url()),
            ContentFormat::Buffer => Content::Buffer(file.data),
        })
    }

    /// Write a whole file, replacing any existing content.
    ///
    /// An existing target is re-opened in write mode and overwritten in
    /// full. An absent target is inserted as a new entry tagged with
    /// `options.mimetype`.
    pub async fn write_file(
        &self,
        path: &str,
        data: impl Into<WriteBuffer>,
        options: &WriteOptions,
    ) -> Result<(), Error> {
        let data = data.into();
        let parsed = StoragePath::parse(path);

        if self.exists(path).await? {
            let handle = self.open(path, options.flag).await?;
            self.write(handle, &data, 0, None, 0).await?;
            return Ok(());
        }

        let storage = self.storage_for(&parsed)?;
        let blob = StoredFile::new(
            parsed.relative.clone(),
            options.mimetype.clone(),
            data.into_bytes(),
        );
        storage.add_named(blob, &parsed.relative).await?;
        Ok(())
    }

    /// List entry names under a path prefix.
    ///
    /// Drives the storage's enumeration cursor to completion. Order is
    /// whatever the backend yields - the in-memory backend sorts keys as
    /// flat strings. If the cursor fails mid-walk, the error carries the
    /// entries accumulated so far.
    pub async fn readdir(&self, path: &str) -> Result<Vec<String>, Error> {
        let parsed = StoragePath::parse(path);
        let storage = self.storage_for(&parsed)?;
        let mut cursor = storage.enumerate(&parsed.relative).await?;

        let mut entries = Vec::new();
        loop {
            match cursor.advance().await {
                Ok(Some(file)) => entries.push(file.name),
                Ok(None) => return Ok(entries),
                Err(source) => return Err(Error::Partial { entries, source }),
            }
        }
    }

    /// Delete the entry at a path.
    pub async fn unlink(&self, path: &str) -> Result<(), Error> {
        let parsed = StoragePath::parse(path);
        let storage = self.storage_for(&parsed)?;
        storage.delete(&parsed.relative).await?;
        Ok(())
    }
}

fn is_utf8(encoding: &str) -> bool {
    encoding.eq_ignore_ascii_case("utf8") || encoding.eq_ignore_ascii_case("utf-8")
}
