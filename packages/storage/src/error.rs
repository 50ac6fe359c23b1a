//! Error types for the capability layer.
//!
//! Errors at this level are storage-focused. No semantic errors like
//! "unparseable path" or "bad argument shape" - those belong in the
//! adapter layer.

/// Errors reported by a device storage backend.
///
/// These are the failures a backend itself can produce. Adapter-level
/// errors (unresolvable storage types, argument validation) are defined
/// in the `devicefs` crate.
#[derive(Debug)]
pub enum StorageError {
    /// No entry exists under the given path.
    NotFound { path: String },

    /// Named insertion was rejected because an entry already exists.
    ///
    /// The in-memory backend never produces this - it overwrites
    /// unconditionally. Backends wrapping a native store may reject
    /// duplicate names.
    AlreadyExists { path: String },

    /// Generic backend failure.
    ///
    /// Use this for device I/O errors, lock poisoning, transport
    /// failures, etc.
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Build a `Backend` error from anything convertible to a boxed error,
    /// including plain message strings.
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StorageError::Backend(error.into())
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound { path } => write!(f, "no entry at '{}'", path),
            StorageError::AlreadyExists { path } => {
                write!(f, "entry already exists at '{}'", path)
            }
            StorageError::Backend(e) => write!(f, "backend error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Backend(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Backend(Box::new(e))
    }
}
