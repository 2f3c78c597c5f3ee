//! CLI module for exitdir - command-line interface and subcommands.
//!
//! Provides the demonstration entry points: leader/work processes that
//! signal completion, and follower/busy processes that tick until the
//! signal arrives.

pub mod commands;

pub use commands::Cli;
