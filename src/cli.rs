use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI for the cover acquisition pipeline
#[derive(Parser)]
#[command(name = "coverscout")]
#[command(about = "Fetch missing book cover art from public search sources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the two-pass acquisition pipeline over the whole catalog
    Fetch {
        /// Catalog JSON file
        #[arg(short, long, default_value = "books.json")]
        catalog: PathBuf,
        /// Directory covers are written to (defaults to the app data dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// TOML file overriding timeouts and pacing
        #[arg(long)]
        config: Option<PathBuf>,
        /// Re-fetch covers even when a stored file already exists
        #[arg(long)]
        force: bool,
    },
    /// Report which entries already have a stored cover, without fetching
    Status {
        /// Catalog JSON file
        #[arg(short, long, default_value = "books.json")]
        catalog: PathBuf,
        /// Directory covers are stored in (defaults to the app data dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
