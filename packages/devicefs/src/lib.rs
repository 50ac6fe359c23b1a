//! devicefs: fs-flavored asynchronous file operations over device storage.
//!
//! This crate adapts a capability-based storage subsystem - lookup,
//! editable lookup, cursor enumeration, deletion, named insertion - into
//! the familiar file-I/O surface: `open`, `read`, `write`, `read_file`,
//! `write_file`, `readdir`, `unlink`, `exists`.
//!
//! Paths are storage-qualified strings of the form `"<type>:<rel/path>"`;
//! the prefix selects which backing store a call operates on. The backing
//! store is supplied as a [`StorageResolver`] strategy at construction,
//! so swapping a real device for the in-memory backend is a constructor
//! argument, not a global switch.
//!
//! # Example
//!
//! ```rust,ignore
//! use devicefs::{DeviceFs, ReadOptions, WriteOptions};
//! use devicefs_memory::MemoryResolver;
//!
//! let fs = DeviceFs::with_resolver(MemoryResolver::with_types(["sdcard"]));
//!
//! fs.write_file("sdcard:notes/a.txt", "hello", &WriteOptions::default()).await?;
//! let content = fs.read_file("sdcard:notes/a.txt", &ReadOptions::default()).await?;
//! assert_eq!(content.as_text(), Some("hello"));
//! ```

pub use bytes::{Bytes, BytesMut};

mod content;
mod error;
mod fs;
mod options;
mod path;

pub use content::{Content, WriteBuffer};
pub use error::Error;
pub use fs::DeviceFs;
pub use options::{ContentFormat, OpenMode, ReadOptions, WriteOptions};
pub use path::StoragePath;

// Re-export capability types for convenience
pub use devicefs_storage::{
    DeferredFile, DeviceStorage, FileHandle, LockedFile, StorageCursor, StorageError,
    StorageResolver, StoredFile,
};
