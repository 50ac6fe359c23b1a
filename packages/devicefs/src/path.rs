//! Storage-qualified path parsing.

use std::fmt;

/// A path split into storage type and relative path.
///
/// # Path Syntax
///
/// - Everything before the *first* colon names the storage type
/// - Everything after it is the relative path, colons included
/// - A path with no colon carries no storage type; resolving such a
///   path fails, so callers should always qualify paths
///
/// Surrounding whitespace is trimmed before splitting.
///
/// # Examples
///
/// ```rust
/// use devicefs::StoragePath;
///
/// let path = StoragePath::parse("sdcard:photos/cat.png");
/// assert_eq!(path.storage_type.as_deref(), Some("sdcard"));
/// assert_eq!(path.relative, "photos/cat.png");
///
/// // Embedded colons stay in the relative path.
/// let path = StoragePath::parse("sdcard:a:b");
/// assert_eq!(path.relative, "a:b");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct StoragePath {
    /// Storage type named by the prefix, if the path had one.
    pub storage_type: Option<String>,
    /// Path within the storage.
    pub relative: String,
}

impl StoragePath {
    /// Split a path string on its first colon.
    ///
    /// This never fails: an unqualified path simply has no storage type.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.split_once(':') {
            Some((storage_type, relative)) => Self {
                storage_type: Some(storage_type.to_string()),
                relative: relative.to_string(),
            },
            None => Self {
                storage_type: None,
                relative: s.to_string(),
            },
        }
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.storage_type {
            Some(storage_type) => write!(f, "{}:{}", storage_type, self.relative),
            None => write!(f, "{}", self.relative),
        }
    }
}
