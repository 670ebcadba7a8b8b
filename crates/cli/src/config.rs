//! Command-line configuration and storage selection.

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use fittrack_storage::{JsonStorage, Storage};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fittrack")]
#[command(about = "Track exercises, workout routines and rep goals", long_about = None)]
pub struct Cli {
    /// Directory holding the tracker's data
    #[arg(long, default_value = ".fittrack")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = Backend::Json)]
    pub backend: Backend,

    /// Keep existing goals instead of replacing them
    #[arg(long)]
    pub no_overwrite_goals: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// One JSON file per record
    Json,
    /// Single SQLite database file
    Sqlite,
}

/// Open the configured storage backend under the data directory.
pub async fn open_storage(cli: &Cli) -> Result<Arc<dyn Storage>> {
    match cli.backend {
        Backend::Json => {
            let storage = JsonStorage::new(&cli.data_dir).await?;
            info!("Using JSON storage at {}", cli.data_dir.display());
            Ok(Arc::new(storage))
        }
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            tokio::fs::create_dir_all(&cli.data_dir).await?;
            let path = cli.data_dir.join("fittrack.db");
            let storage = fittrack_storage::SqliteStorage::new_from_path(&path).await?;
            info!("Using SQLite storage at {}", path.display());
            Ok(Arc::new(storage))
        }
        #[cfg(not(feature = "sqlite"))]
        Backend::Sqlite => {
            anyhow::bail!("SQLite backend not available: rebuild with the `sqlite` feature")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["fittrack"]);
        assert_eq!(cli.data_dir, PathBuf::from(".fittrack"));
        assert_eq!(cli.backend, Backend::Json);
        assert!(!cli.no_overwrite_goals);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "fittrack",
            "--data-dir",
            "/tmp/ft",
            "--backend",
            "sqlite",
            "--no-overwrite-goals",
            "-vv",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/ft"));
        assert_eq!(cli.backend, Backend::Sqlite);
        assert!(cli.no_overwrite_goals);
        assert_eq!(cli.verbose, 2);
    }

    #[tokio::test]
    async fn test_open_json_storage_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let cli = Cli::parse_from(["fittrack", "--data-dir", data_dir.to_str().unwrap()]);

        let storage = open_storage(&cli).await.unwrap();
        assert!(storage.list_goals().await.unwrap().is_empty());
        assert!(data_dir.join("goals").is_dir());
    }
}
