//! Exit directory configuration
//!
//! The exit directory is the single knob of the whole crate: when it is set,
//! both coordinator operations run against it; when it is absent the feature
//! is disabled and both operations are no-ops. This lets the same binary run
//! with or without sidecar coordination, controlled purely by deployment.
//!
//! Configuration is resolved once, at construction, and injected into
//! [`crate::signal::ExitSignal`]; operations never re-read the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the shared exit directory.
pub const EXIT_DIR_ENV: &str = "EXIT_DIR";

/// Name of the marker file created inside the exit directory.
///
/// Fixed and well-known: producer and consumer must agree on it, so it is a
/// constant rather than configuration. The file is zero-byte; only its
/// existence carries meaning.
pub const EXIT_FILE: &str = "exitFile";

/// Configuration for the exit signaling coordinator.
///
/// `exit_dir: None` means disabled; this is a valid operating mode, not an
/// error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    /// Shared directory both sides of the protocol agree on, typically an
    /// ephemeral volume mounted into every container of a pod.
    pub exit_dir: Option<PathBuf>,
}

impl ExitConfig {
    /// Config pointing at the given exit directory
    pub fn new(exit_dir: impl Into<PathBuf>) -> Self {
        Self {
            exit_dir: Some(exit_dir.into()),
        }
    }

    /// Config with the coordination feature disabled
    pub fn disabled() -> Self {
        Self { exit_dir: None }
    }

    /// Resolve the exit directory from the `EXIT_DIR` environment variable.
    ///
    /// Unset or empty means disabled. A set value is normalized so the stored
    /// directory carries no trailing path separator; joins then produce
    /// exactly one separator between directory and file name.
    pub fn from_env() -> Self {
        match env::var(EXIT_DIR_ENV) {
            Ok(raw) if !raw.is_empty() => Self {
                exit_dir: Some(normalize(&raw)),
            },
            _ => Self::disabled(),
        }
    }

    /// Whether the coordination feature is enabled
    pub fn is_enabled(&self) -> bool {
        self.exit_dir.is_some()
    }

    /// The configured exit directory, if any
    pub fn dir(&self) -> Option<&Path> {
        self.exit_dir.as_deref()
    }

    /// Full path of the marker file, `None` when disabled
    pub fn exit_file(&self) -> Option<PathBuf> {
        self.exit_dir.as_ref().map(|dir| dir.join(EXIT_FILE))
    }
}

/// Strip trailing separators so the directory is in canonical form for joins.
fn normalize(raw: &str) -> PathBuf {
    let trimmed = raw.trim_end_matches(std::path::MAIN_SEPARATOR);
    if trimmed.is_empty() {
        // The value was all separators, i.e. the filesystem root.
        PathBuf::from(std::path::MAIN_SEPARATOR.to_string())
    } else {
        PathBuf::from(trimmed)
    }
}
