mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use coverscout::catalog::load_catalog;
use coverscout::config::FetchConfig;
use coverscout::pipeline::{self, RunReport};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch {
            catalog,
            out,
            config,
            force,
        } => {
            let entries = load_catalog(&catalog)?;
            let config = match config {
                Some(path) => FetchConfig::from_file(&path)?,
                None => FetchConfig::default(),
            };
            let covers_dir = out.unwrap_or_else(default_covers_dir);
            // Per-entry misses are reported in the summary; only run-level
            // failures propagate out of the pipeline and exit non-zero.
            let report = pipeline::run(&entries, &covers_dir, &config, force).await?;
            print_report(&report);
        }
        Commands::Status { catalog, out } => {
            let entries = load_catalog(&catalog)?;
            let covers_dir = out.unwrap_or_else(default_covers_dir);
            let (satisfied, missing) = pipeline::scan_status(&entries, &covers_dir).await;
            println!(
                "{} of {} covers present in {}",
                satisfied,
                entries.len(),
                covers_dir.display()
            );
            for (id, title) in &missing {
                println!("missing: {title} ({id})");
            }
        }
    }
    Ok(())
}

// Default to a per-user data directory, same as the rest of the app's state.
fn default_covers_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "coverscout")
        .map(|dirs| dirs.data_dir().join("covers"))
        .unwrap_or_else(|| PathBuf::from("covers"))
}

fn print_report(report: &RunReport) {
    println!("\nFinished processing all entries.");
    println!("already present: {}", report.skipped);
    println!("downloaded:      {}", report.downloaded);
    if report.failed.is_empty() {
        println!("all covers accounted for");
    } else {
        println!("failed to find covers for {} entries:", report.failed.len());
        for (_, title) in &report.failed {
            println!("- {title}");
        }
    }
}
