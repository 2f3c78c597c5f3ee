use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use exitdir::{ExitConfig, ExitSignal};

fn setup_logging() {
    // Demo processes log to stderr; stdout carries the tick/exit lines.
    env_logger::Builder::from_default_env().init();
}

/// CLI flag wins over the EXIT_DIR environment variable.
fn resolve_config(cli: &Cli) -> ExitConfig {
    match &cli.exit_dir {
        Some(dir) => ExitConfig::new(dir.clone()),
        None => ExitConfig::from_env(),
    }
}

/// Leader role: simulate work, then signal followers to exit.
async fn run_leader(label: &str, work_secs: u64, signal: &ExitSignal) -> Result<()> {
    info!("{label} working for {work_secs}s before signaling");

    println!("[{label}] Doing work...");
    tokio::time::sleep(Duration::from_secs(work_secs)).await;
    println!("[{label}] Exiting...");

    signal.raise().context("Failed to raise exit signal")
}

/// Follower role: tick until the exit signal or Ctrl-C cancels the context.
async fn run_follower(label: &str, tick_secs: u64, signal: &ExitSignal) -> Result<()> {
    let parent = CancellationToken::new();
    {
        let parent = parent.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, shutting down");
                parent.cancel();
            }
        });
    }

    // A misconfigured directory is fatal here: continuing un-watched would
    // hang the sidecar forever.
    let ctx = signal
        .aware(&parent)
        .context("Failed to arm exit directory watch")?;

    let mut ticker = tokio::time::interval(Duration::from_secs(tick_secs));
    // The first interval tick completes immediately; consume it so ticks
    // print on the period like a plain ticker.
    ticker.tick().await;

    let mut i = 0u64;
    loop {
        tokio::select! {
            _ = ctx.cancelled() => {
                println!("[{label}] Exiting...");
                return Ok(());
            }
            _ = ticker.tick() => {
                println!("[{label}] Tick {i}");
                i += 1;
            }
        }
    }
}

async fn run_application(cli: &Cli, signal: &ExitSignal) -> Result<()> {
    info!("Starting {} role", cli.command.label());

    if cli.is_verbose() {
        match signal.config().dir() {
            Some(dir) => println!("{} {}", "Exit directory:".yellow(), dir.display()),
            None => println!("{}", "Exit signaling disabled (no exit directory)".yellow()),
        }
    }

    let label = cli.command.label();
    match &cli.command {
        Commands::Leader { work_secs } | Commands::Work { work_secs } => {
            run_leader(label, *work_secs, signal).await
        }
        Commands::Follower { tick_secs } | Commands::Busy { tick_secs } => {
            run_follower(label, *tick_secs, signal).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let signal = ExitSignal::new(resolve_config(&cli));

    run_application(&cli, &signal).await.context("Application failed")?;

    Ok(())
}
