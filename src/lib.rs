//! exitdir - filesystem-based exit signaling for sidecar coordination
//!
//! One process (the leader) signals completion by creating a marker file in
//! a shared directory; followers watch that directory and cancel their own
//! execution context when the marker appears, including when it already
//! existed before watching began. Designed for sidecar containers sharing
//! an ephemeral volume.

pub mod config;
pub mod error;
pub mod signal;

pub use config::{ExitConfig, EXIT_DIR_ENV, EXIT_FILE};
pub use error::{ExitdirError, Result};
pub use signal::ExitSignal;
