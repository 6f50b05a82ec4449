//! Download coordinator - bounded-concurrency fetch of collected documents
//!
//! A pass runs in two phases:
//! 1. Single-threaded dedup over the collected records in extraction order,
//!    so the winner for every identity key is fixed before any fetch starts
//! 2. One worker per surviving destination path, bounded by a semaphore
//!
//! Every record ends in exactly one terminal `DownloadState`.

use crate::catalog::{CategoryResultSet, DocumentRecord};
use crate::dedup::{DuplicateIndex, Resolution};
use crate::download::file::{download_file, staging_path_for};
use crate::download::progress::{Progress, ProgressTracker};
use crate::state::DownloadState;
use crate::HarvestError;
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Default number of file fetches in flight at once
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Outcome counts of a download pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Records offered to the pass
    pub total: usize,

    /// Files fetched and moved into place
    pub downloaded: usize,

    /// Records whose destination already existed or was claimed this run
    pub exists_skipped: usize,

    /// Records collapsed into another record with the same identity
    pub duplicates: usize,

    /// Records whose fetch failed
    pub failed: usize,
}

impl DownloadReport {
    fn from_progress(progress: &Progress) -> Self {
        Self {
            total: progress.total,
            downloaded: progress.count(DownloadState::Downloaded),
            exists_skipped: progress.count(DownloadState::ExistsSkipped),
            duplicates: progress.count(DownloadState::DuplicateSkipped),
            failed: progress.count(DownloadState::Failed),
        }
    }

    /// Records counted as completed (downloaded, exists-skipped or duplicate)
    pub fn completed(&self) -> usize {
        self.downloaded + self.exists_skipped + self.duplicates
    }
}

/// Result of a download pass
#[derive(Debug, Clone)]
pub struct DownloadPass {
    /// The dedup survivors, rebuilt per category
    pub survivors: CategoryResultSet,

    /// Outcome counts
    pub report: DownloadReport,
}

/// Fetches the files referenced by collected records
pub struct DownloadCoordinator {
    client: Client,
    documents_root: PathBuf,
    base_url: Url,
    max_concurrent: usize,
}

impl DownloadCoordinator {
    /// Creates a coordinator
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client shared by all workers
    /// * `documents_root` - Root that record `local_path`s are joined onto
    /// * `base_url` - Base for resolving relative download URLs
    /// * `max_concurrent` - Maximum fetches in flight (at least 1)
    pub fn new(
        client: Client,
        documents_root: impl Into<PathBuf>,
        base_url: Url,
        max_concurrent: usize,
    ) -> Self {
        Self {
            client,
            documents_root: documents_root.into(),
            base_url,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Absolute destination of a record
    pub fn destination(&self, record: &DocumentRecord) -> PathBuf {
        self.documents_root.join(&record.local_path)
    }

    /// Staging file of a record while its fetch is in flight
    pub fn staging_path(&self, record: &DocumentRecord) -> PathBuf {
        staging_path_for(&self.documents_root, &record.local_path)
    }

    /// Resolves a listing href against the base URL
    ///
    /// Returns None for empty hrefs and for non-HTTP(S) targets.
    pub fn resolve_url(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        self.base_url
            .join(href)
            .ok()
            .filter(|url| url.scheme() == "http" || url.scheme() == "https")
    }

    /// Runs a download pass over the collected records
    ///
    /// # Returns
    ///
    /// * `Ok(DownloadPass)` - Survivors and outcome counts; per-record
    ///   failures are logged and counted, never returned
    /// * `Err(HarvestError)` - The worker pool was closed
    pub async fn run(&self, collected: &CategoryResultSet) -> Result<DownloadPass, HarvestError> {
        let total = collected.total_documents();
        let tracker = Arc::new(ProgressTracker::new(total));
        tracing::info!(total, max_concurrent = self.max_concurrent, "Starting download pass");

        let index = resolve_duplicates(collected, &tracker);
        tracing::info!(
            survivors = index.len(),
            duplicates = index.duplicate_count(),
            "Duplicate resolution complete"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut workers = JoinSet::new();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for record in index.survivors() {
            let dest = self.destination(record);
            if !claimed.insert(dest.clone()) {
                tracing::warn!(
                    name = %record.name,
                    path = %dest.display(),
                    "Destination already claimed by another document, skipping"
                );
                tracker.record(DownloadState::ExistsSkipped);
                continue;
            }

            let permit = Arc::clone(&semaphore).acquire_owned().await?;
            let client = self.client.clone();
            let tracker = Arc::clone(&tracker);
            let url = self.resolve_url(&record.download_url);
            let name = record.name.clone();
            let raw_url = record.download_url.clone();
            let tmp_path = self.staging_path(record);

            workers.spawn(async move {
                let _permit = permit;
                let state = fetch_record(&client, url, &raw_url, &name, &dest, &tmp_path).await;
                tracker.record(state);
                state
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Download worker panicked: {}", e);
                tracker.record(DownloadState::Failed);
            }
        }

        let report = DownloadReport::from_progress(&tracker.snapshot());
        tracing::info!(
            total = report.total,
            downloaded = report.downloaded,
            exists_skipped = report.exists_skipped,
            duplicates = report.duplicates,
            failed = report.failed,
            "Download pass complete"
        );

        Ok(DownloadPass {
            survivors: index.into_result_set(),
            report,
        })
    }
}

/// Offers every record to a fresh index in extraction order
///
/// Each losing record, whether rejected on arrival or evicted later, is
/// recorded as `DuplicateSkipped`.
fn resolve_duplicates(collected: &CategoryResultSet, tracker: &ProgressTracker) -> DuplicateIndex {
    let mut index = DuplicateIndex::new();

    for record in collected.records() {
        match index.offer(record.clone()) {
            Resolution::Kept => {}
            Resolution::Superseded { previous } => {
                tracing::info!(
                    name = %previous.name,
                    category = %previous.category,
                    "Duplicate document superseded by a more complete entry"
                );
                tracker.record(DownloadState::DuplicateSkipped);
            }
            Resolution::Duplicate => {
                tracing::info!(
                    name = %record.name,
                    category = %record.category,
                    "Duplicate document, skipping"
                );
                tracker.record(DownloadState::DuplicateSkipped);
            }
        }
    }

    index
}

/// Takes one surviving record to its terminal state
async fn fetch_record(
    client: &Client,
    url: Option<Url>,
    raw_url: &str,
    name: &str,
    dest: &Path,
    tmp_path: &Path,
) -> DownloadState {
    if matches!(tokio::fs::try_exists(dest).await, Ok(true)) {
        tracing::info!(path = %dest.display(), "File already exists, skipping download");
        return DownloadState::ExistsSkipped;
    }

    let Some(url) = url else {
        tracing::warn!(name, url = raw_url, "Cannot resolve download URL");
        return DownloadState::Failed;
    };

    tracing::info!(name, url = %url, "Downloading");
    match download_file(client, url.as_str(), dest, tmp_path).await {
        Ok(bytes) => {
            tracing::info!(name, bytes, "Downloaded");
            DownloadState::Downloaded
        }
        Err(e) => {
            tracing::warn!(name, "Download failed: {}", e);
            DownloadState::Failed
        }
    }
}
