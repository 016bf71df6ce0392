use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{info, warn};

use crate::catalog::CatalogEntry;
use crate::config::FetchConfig;
use crate::covers;
use crate::providers::{self, CoverProvider};
use crate::session::{Identity, Session};

/// Outcome summary for a full run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Entries skipped because a non-empty cover already existed.
    pub skipped: usize,
    /// Entries satisfied by a download during this run.
    pub downloaded: usize,
    /// Entries with no cover after both passes: (id, title).
    pub failed: Vec<(String, String)>,
}

/// Outcome of one provider-chain sweep for one entry.
enum AttemptOutcome {
    Satisfied,
    Miss,
}

/// Run the full two-pass acquisition pipeline over the catalog.
///
/// Entries are processed strictly in order; the primary pass completes
/// before the retry pass starts, and the retry pass sees only the primary
/// misses, with a fresh session identity and an alternate provider order.
/// Only covers-directory creation and session startup abort the run;
/// everything per-entry is caught, logged and reflected in the report.
pub async fn run(
    catalog: &[CatalogEntry],
    covers_dir: &Path,
    config: &FetchConfig,
    force: bool,
) -> Result<RunReport> {
    run_with(
        catalog,
        covers_dir,
        config,
        force,
        providers::primary_chain(config),
        providers::retry_chain(),
    )
    .await
}

pub(crate) async fn run_with(
    catalog: &[CatalogEntry],
    covers_dir: &Path,
    config: &FetchConfig,
    force: bool,
    primary: Vec<Box<dyn CoverProvider>>,
    retry: Vec<Box<dyn CoverProvider>>,
) -> Result<RunReport> {
    tokio::fs::create_dir_all(covers_dir)
        .await
        .with_context(|| format!("failed to create covers directory {}", covers_dir.display()))?;

    let session = Session::start(Identity::primary(), config)?;
    let mut report = RunReport::default();
    let mut failures: Vec<&CatalogEntry> = Vec::new();

    info!(entries = catalog.len(), dir = %covers_dir.display(), "starting primary pass");
    for entry in catalog {
        if force {
            covers::remove_all(covers_dir, &entry.id).await;
        } else if let Some(existing) = covers::find_existing(covers_dir, &entry.id).await {
            info!(title = %entry.title, path = %existing.display(), "cover already present, skipping");
            report.skipped += 1;
            continue;
        } else {
            covers::remove_stale(covers_dir, &entry.id).await;
        }

        info!(id = %entry.id, title = %entry.title, author = %entry.author, "processing");
        match sweep(&session, &primary, entry, covers_dir).await {
            AttemptOutcome::Satisfied => report.downloaded += 1,
            AttemptOutcome::Miss => {
                info!(title = %entry.title, "no cover on primary pass, queued for retry");
                failures.push(entry);
            }
        }
        polite_delay(config).await;
    }

    if !failures.is_empty() {
        info!(count = failures.len(), "retrying failed entries with alternate sources");
        let session = Session::start(Identity::retry(), config)?;
        for entry in &failures {
            info!(id = %entry.id, title = %entry.title, "retrying");
            match sweep(&session, &retry, entry, covers_dir).await {
                AttemptOutcome::Satisfied => report.downloaded += 1,
                AttemptOutcome::Miss => {
                    warn!(title = %entry.title, "no cover found on retry pass")
                }
            }
            polite_delay(config).await;
        }
    }

    // Re-scan so the report reflects what is actually on disk.
    for entry in catalog {
        if covers::find_existing(covers_dir, &entry.id).await.is_none() {
            report.failed.push((entry.id.clone(), entry.title.clone()));
        }
    }
    Ok(report)
}

/// Try each provider in order until one yields a downloadable cover.
///
/// A failed download burns the whole provider attempt; further candidates
/// from the same provider are not tried within this pass.
async fn sweep(
    session: &Session,
    chain: &[Box<dyn CoverProvider>],
    entry: &CatalogEntry,
    covers_dir: &Path,
) -> AttemptOutcome {
    for provider in chain {
        let candidates = match provider.candidates(session, entry).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(provider = provider.name(), title = %entry.title, error = %e, "provider query failed");
                continue;
            }
        };
        let Some(candidate) = candidates.first() else {
            info!(provider = provider.name(), title = %entry.title, "no candidates");
            continue;
        };
        if candidates.len() > 1 {
            info!(provider = provider.name(), found = candidates.len(), "candidate image urls");
        }

        let ext = covers::extension_for(candidate);
        let dest = covers::cover_path(covers_dir, &entry.id, ext);
        info!(provider = provider.name(), url = %candidate, dest = %dest.display(), "downloading");
        match session.download(candidate, &dest).await {
            Ok(()) => {
                info!(title = %entry.title, "cover downloaded");
                return AttemptOutcome::Satisfied;
            }
            Err(e) => {
                warn!(provider = provider.name(), url = %candidate, error = %e, "download failed")
            }
        }
    }
    AttemptOutcome::Miss
}

/// Scan the covers directory against the catalog without touching the
/// network. Returns the satisfied count and the missing (id, title) pairs.
pub async fn scan_status(
    catalog: &[CatalogEntry],
    covers_dir: &Path,
) -> (usize, Vec<(String, String)>) {
    let mut satisfied = 0;
    let mut missing = Vec::new();
    for entry in catalog {
        match covers::find_existing(covers_dir, &entry.id).await {
            Some(_) => satisfied += 1,
            None => missing.push((entry.id.clone(), entry.title.clone())),
        }
    }
    (satisfied, missing)
}

/// Suspend between entries to bound the request rate against the sources.
async fn polite_delay(config: &FetchConfig) {
    let (min, max) = (config.delay_min_ms, config.delay_max_ms);
    let ms = if max > min {
        rand::rng().random_range(min..max)
    } else {
        min
    };
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
