//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - leader/work: do some work, then raise the exit signal
//! - follower/busy: tick on a timer until the exit signal arrives

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// exitdir - filesystem-based exit signaling for sidecar coordination
#[derive(Parser, Debug)]
#[command(name = "exitdir")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Exit directory; overrides the EXIT_DIR environment variable
    #[arg(short, long, global = true)]
    pub exit_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Do some work, then signal followers to exit
    Leader {
        /// Seconds of simulated work before signaling
        #[arg(short, long, default_value_t = 5)]
        work_secs: u64,
    },

    /// Tick on a timer until the leader signals exit
    Follower {
        /// Seconds between ticks
        #[arg(short, long, default_value_t = 1)]
        tick_secs: u64,
    },

    /// Same as leader, labeled for the work/busy container pair
    Work {
        /// Seconds of simulated work before signaling
        #[arg(short, long, default_value_t = 5)]
        work_secs: u64,
    },

    /// Same as follower, labeled for the work/busy container pair
    Busy {
        /// Seconds between ticks
        #[arg(short, long, default_value_t = 1)]
        tick_secs: u64,
    },
}

impl Commands {
    /// Status-line label matching the original container names
    pub fn label(&self) -> &'static str {
        match self {
            Commands::Leader { .. } => "Leader",
            Commands::Follower { .. } => "Follower",
            Commands::Work { .. } => "Work",
            Commands::Busy { .. } => "Busy",
        }
    }
}
