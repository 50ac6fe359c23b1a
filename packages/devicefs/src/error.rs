//! Error types for the adapter layer.

use devicefs_storage::StorageError;

/// Errors reported by `DeviceFs` operations.
///
/// Every failure travels through the returned `Result`; argument-shape
/// problems included. Nothing in this crate panics on bad input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No backing store resolves for the path's storage type.
    #[error("unable to find entry point for '{path}'")]
    StorageNotFound { path: String },

    /// A handle could not be made readable or writable.
    #[error("invalid file handle: {message}")]
    InvalidHandle { message: String },

    /// A required argument was absent or the wrong shape.
    #[error("missing or invalid argument: {message}")]
    MissingArgument { message: String },

    /// Enumeration failed mid-listing; `entries` holds everything
    /// accumulated before the failure.
    #[error("listing stopped after {} entries: {source}", entries.len())]
    Partial {
        entries: Vec<String>,
        source: StorageError,
    },

    /// The underlying storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn display_includes_the_path() {
        let e = Error::StorageNotFound {
            path: "music:a".to_string(),
        };
        assert_eq!(format!("{}", e), "unable to find entry point for 'music:a'");
    }

    #[test]
    fn partial_reports_progress_and_cause() {
        let e = Error::Partial {
            entries: vec!["dir/a".to_string(), "dir/b".to_string()],
            source: StorageError::backend("cursor died"),
        };
        let display = format!("{}", e);
        assert!(display.contains("2 entries"));
        assert!(display.contains("cursor died"));
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn storage_errors_convert_transparently() {
        let e: Error = StorageError::NotFound {
            path: "a".to_string(),
        }
        .into();
        assert!(matches!(e, Error::Storage(_)));
        assert_eq!(format!("{}", e), "no entry at 'a'");
    }
}
