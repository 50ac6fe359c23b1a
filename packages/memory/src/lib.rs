//! In-memory device storage backend.
//!
//! Reproduces the externally observed behavior of a native device storage
//! through a plain in-memory file table, so `DeviceFs` call sites written
//! against the asynchronous capability surface run without a device:
//! - `MemoryStorage`: one storage pool over a sorted path-to-entry table
//! - `MemoryResolver`: pools keyed by storage type name
//! - handle implementations for all three `FileHandle` shapes, selected
//!   by a `HandleShape` knob
//!
//! Operations complete synchronously inside the async call sites, so
//! completion interleaving will not match a native backend; callers must
//! not depend on identical ordering between the two.

mod handles;
mod resolver;
mod storage;

pub use handles::{MemoryDeferredFile, MemoryLockedFile};
pub use resolver::MemoryResolver;
pub use storage::{HandleShape, MemoryStorage};
