//! Exit signaling coordinator
//!
//! Bridges a filesystem watch to cancellation: a follower derives a child
//! [`CancellationToken`] that cancels when any file appears in the shared
//! exit directory, and a leader raises the signal by creating the marker
//! file there. The directory check runs only after the watch is armed, so a
//! marker created before the follower started is never missed.

use std::fs::{self, File};
use std::path::Path;

use log::{debug, info, warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ExitConfig;
use crate::error::{ExitdirError, Result};

/// Coordinator for exit signaling over a shared directory.
///
/// Both operations are no-ops when the config is disabled, so callers can
/// wire this in unconditionally and let deployment decide whether the
/// feature is live.
#[derive(Debug, Clone)]
pub struct ExitSignal {
    config: ExitConfig,
}

impl ExitSignal {
    /// Create a coordinator with an explicit configuration
    pub fn new(config: ExitConfig) -> Self {
        Self { config }
    }

    /// Create a coordinator configured from the `EXIT_DIR` environment variable
    pub fn from_env() -> Self {
        Self::new(ExitConfig::from_env())
    }

    /// The injected configuration
    pub fn config(&self) -> &ExitConfig {
        &self.config
    }

    /// Derive a cancellation token that fires when the exit signal is raised.
    ///
    /// Disabled config returns a clone of `parent` (pure pass-through, no
    /// task, no filesystem access). Otherwise the watch is armed and the
    /// directory enumerated before this returns, then a background task
    /// waits for a create event; the returned child token cancels when the
    /// marker appears, or whenever `parent` cancels.
    ///
    /// A pre-existing marker yields an already-canceled token with no watch
    /// task left running.
    ///
    /// Errors are setup failures (unwatchable or unreadable directory);
    /// these reflect deployment misconfiguration and callers normally abort
    /// on them. Must be called from within a tokio runtime.
    pub fn aware(&self, parent: &CancellationToken) -> Result<CancellationToken> {
        let Some(dir) = self.config.dir() else {
            return Ok(parent.clone());
        };

        let (tx, events) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |event| {
            // A closed channel only means the watch task is gone; nothing
            // to do about it from the watcher thread.
            let _ = tx.send(event);
        })
        .map_err(|source| watch_setup_error(dir, source))?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| watch_setup_error(dir, source))?;

        let token = parent.child_token();

        // The watch is armed, so a marker that raced with startup is caught
        // either by this enumeration or by the event loop, never lost.
        let mut entries = fs::read_dir(dir).map_err(|source| directory_list_error(dir, source))?;
        match entries.next() {
            Some(Ok(entry)) => {
                debug!(
                    "Exit directory {} already contains {:?}, canceling immediately",
                    dir.display(),
                    entry.file_name()
                );
                token.cancel();
                return Ok(token);
            }
            Some(Err(source)) => return Err(directory_list_error(dir, source)),
            None => {}
        }

        tokio::spawn(watch_for_exit(watcher, events, token.clone()));
        Ok(token)
    }

    /// Raise the exit signal by creating the marker file.
    ///
    /// Disabled config reports success without touching the filesystem.
    /// Creation is create-or-truncate, so raising twice never errors:
    /// existence is the only semantic the protocol carries. The marker is
    /// never read or deleted by this crate; cleanup belongs to the
    /// directory's own lifecycle (e.g. an ephemeral volume).
    pub fn raise(&self) -> Result<()> {
        let Some(path) = self.config.exit_file() else {
            return Ok(());
        };

        File::create(&path).map_err(|source| ExitdirError::MarkerCreate {
            path: path.display().to_string(),
            source,
        })?;
        info!("Created exit file {}", path.display());
        Ok(())
    }
}

fn watch_setup_error(dir: &Path, source: notify::Error) -> ExitdirError {
    ExitdirError::WatchSetup {
        dir: dir.display().to_string(),
        source,
    }
}

fn directory_list_error(dir: &Path, source: std::io::Error) -> ExitdirError {
    ExitdirError::DirectoryList {
        dir: dir.display().to_string(),
        source,
    }
}

/// Background event loop: cancels `token` on the first create event.
///
/// The watcher is owned here so the OS watch lives exactly as long as this
/// task. At most one cancel happens per watch lifetime; the loop also exits
/// when `token` cancels first (e.g. through its parent), or when the event
/// channel closes.
async fn watch_for_exit(
    watcher: RecommendedWatcher,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    token: CancellationToken,
) {
    let _watcher = watcher;
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Context canceled, stopping exit directory watch");
                return;
            }
            event = events.recv() => match event {
                Some(Ok(event)) if matches!(event.kind, EventKind::Create(_)) => {
                    debug!("Exit file created, canceling context");
                    token.cancel();
                    return;
                }
                // Modifications, deletions and nested events are not exit
                // signals.
                Some(Ok(_)) => {}
                Some(Err(err)) => warn!("Error from exit directory watcher: {err}"),
                None => {
                    debug!("Watch event channel closed without an exit signal");
                    return;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EXIT_FILE;
    use tempfile::TempDir;

    #[test]
    fn test_raise_creates_zero_byte_marker() {
        let temp = TempDir::new().unwrap();
        let signal = ExitSignal::new(ExitConfig::new(temp.path()));

        signal.raise().unwrap();

        let marker = temp.path().join(EXIT_FILE);
        assert!(marker.exists());
        assert_eq!(fs::metadata(&marker).unwrap().len(), 0);
    }

    #[test]
    fn test_raise_disabled_is_noop() {
        let signal = ExitSignal::new(ExitConfig::disabled());
        signal.raise().unwrap();
    }

    #[test]
    fn test_raise_twice_never_errors() {
        let temp = TempDir::new().unwrap();
        let signal = ExitSignal::new(ExitConfig::new(temp.path()));

        signal.raise().unwrap();
        signal.raise().unwrap();
        assert!(temp.path().join(EXIT_FILE).exists());
    }

    #[test]
    fn test_raise_missing_directory_reports_failure() {
        let temp = TempDir::new().unwrap();
        let signal = ExitSignal::new(ExitConfig::new(temp.path().join("missing")));

        let err = signal.raise().unwrap_err();
        assert!(matches!(err, ExitdirError::MarkerCreate { .. }));
        assert!(!err.is_fatal_setup());
    }

    #[tokio::test]
    async fn test_aware_disabled_is_passthrough() {
        let signal = ExitSignal::new(ExitConfig::disabled());
        let parent = CancellationToken::new();

        let ctx = signal.aware(&parent).unwrap();
        assert!(!ctx.is_cancelled());

        parent.cancel();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_aware_existing_marker_cancels_immediately() {
        let temp = TempDir::new().unwrap();
        let signal = ExitSignal::new(ExitConfig::new(temp.path()));
        signal.raise().unwrap();

        let parent = CancellationToken::new();
        let ctx = signal.aware(&parent).unwrap();

        assert!(ctx.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_aware_any_existing_entry_counts_as_signaled() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("leftover")).unwrap();

        let signal = ExitSignal::new(ExitConfig::new(temp.path()));
        let ctx = signal.aware(&CancellationToken::new()).unwrap();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_aware_missing_directory_is_fatal_setup() {
        let temp = TempDir::new().unwrap();
        let signal = ExitSignal::new(ExitConfig::new(temp.path().join("missing")));

        let err = signal.aware(&CancellationToken::new()).unwrap_err();
        assert!(err.is_fatal_setup());
    }
}
