//! Error types for exitdir
//!
//! Centralized error handling using thiserror.
//!
//! An unconfigured exit directory is not represented here: it is a valid
//! operating mode (both operations become no-ops), encoded as `None` in
//! [`crate::config::ExitConfig`]. Transient watcher stream errors are also
//! absent; they are logged inside the watch loop and never surfaced.

use thiserror::Error;

/// All error types that can occur in exitdir
#[derive(Debug, Error)]
pub enum ExitdirError {
    /// The filesystem watch could not be armed on the exit directory.
    ///
    /// This is a deployment misconfiguration (missing directory, bad
    /// permissions); there is nothing useful a caller can do before the
    /// coordination feature is even running, so binaries should treat it
    /// as fatal.
    #[error("Failed to watch exit directory {dir}: {source}")]
    WatchSetup { dir: String, source: notify::Error },

    /// The exit directory could not be enumerated after the watch was armed
    #[error("Failed to read exit directory {dir}: {source}")]
    DirectoryList { dir: String, source: std::io::Error },

    /// The exit file could not be created; recoverable, the caller decides
    #[error("Failed to create exit file {path}: {source}")]
    MarkerCreate { path: String, source: std::io::Error },
}

impl ExitdirError {
    /// Whether this error reflects a setup failure that should abort the
    /// watching process (as opposed to a signaling failure the caller may
    /// choose to handle).
    pub fn is_fatal_setup(&self) -> bool {
        matches!(self, ExitdirError::WatchSetup { .. } | ExitdirError::DirectoryList { .. })
    }
}

/// Result type alias for exitdir operations
pub type Result<T> = std::result::Result<T, ExitdirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_setup_error_display() {
        let err = ExitdirError::WatchSetup {
            dir: "/does/not/exist".to_string(),
            source: notify::Error::path_not_found(),
        };
        assert!(err.to_string().starts_with("Failed to watch exit directory /does/not/exist"));
        assert!(err.is_fatal_setup());
    }

    #[test]
    fn test_directory_list_error_display() {
        let err = ExitdirError::DirectoryList {
            dir: "/restricted".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/restricted"));
        assert!(err.to_string().contains("denied"));
        assert!(err.is_fatal_setup());
    }

    #[test]
    fn test_marker_create_error_display() {
        let err = ExitdirError::MarkerCreate {
            path: "/gone/exitFile".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create exit file /gone/exitFile: no such directory"
        );
        assert!(!err.is_fatal_setup());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        assert!(returns_ok().is_ok());
    }
}
