//! FitTrack CLI - interactive fitness tracker.

mod config;
mod prompt;
mod render;
mod shell;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use fittrack_progress::BasicProgressTracker;
use fittrack_training::BasicTrainingManager;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{open_storage, Cli};
use prompt::Prompter;
use shell::{Shell, ShellConfig};

/// Logs go to stderr so they never mix with the menu on stdout.
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

// Menu input is blocking stdin, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let storage = open_storage(&cli).await?;
    let training = Arc::new(BasicTrainingManager::new(storage.clone()));
    let tracker = Arc::new(BasicProgressTracker::new(storage));
    let config = ShellConfig {
        overwrite_goals: !cli.no_overwrite_goals,
    };

    info!("Starting session (data dir {})", cli.data_dir.display());
    let stdin = io::stdin();
    let mut shell = Shell::new(
        training,
        tracker,
        Prompter::new(stdin.lock(), io::stdout()),
        config,
    );
    shell.run().await?;
    Ok(())
}
