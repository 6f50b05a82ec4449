//! Harvest coordinator - main run orchestration
//!
//! The coordinator owns all state of one run:
//! - Building the HTTP client and preparing the documents root
//! - Walking every category to collect records
//! - Running the download pass, which also resolves duplicates
//! - Holding the final category → records mapping for consumers

use crate::catalog::{CategoryResultSet, DocumentRecord};
use crate::config::Config;
use crate::crawler::build_http_client;
use crate::crawler::walker::{ensure_dir, CategoryWalker};
use crate::download::{DownloadCoordinator, DownloadReport};
use crate::output::HarvestStatistics;
use crate::HarvestError;
use chrono::Utc;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    base_url: Url,
    documents: CategoryResultSet,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Client built and documents root present
    /// * `Err(HarvestError)` - Invalid base URL, client build failure, or the
    ///   documents root could not be created
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.download.request_timeout_secs),
        )?;

        ensure_dir(Path::new(&config.download.documents_dir))?;

        Ok(Self {
            config,
            client,
            base_url,
            documents: CategoryResultSet::new(),
        })
    }

    /// Runs a complete harvest
    ///
    /// 1. Walks all categories and collects records
    /// 2. Runs the download pass over the collected records
    /// 3. Replaces the collected lists with the dedup survivors
    ///
    /// Page and file failures are logged and absorbed; only an unreadable
    /// bootstrap page or an uncreatable directory aborts the run.
    pub async fn run(&mut self) -> Result<HarvestStatistics, HarvestError> {
        let started_at = Utc::now();
        tracing::info!("Starting harvest from {}", self.base_url);

        let walker = CategoryWalker::new(
            self.client.clone(),
            self.config.site.base_url.clone(),
            &self.config.site.html_dir,
            &self.config.download.documents_dir,
        );
        self.documents = walker.walk_all().await?;
        tracing::info!(
            collected = self.documents.total_documents(),
            "Finished walking categories"
        );

        let report = self.download().await?;

        let stats = HarvestStatistics::from_run(&self.documents, &report, started_at, Utc::now());
        tracing::info!(
            documents = stats.total_documents,
            duplicates = stats.duplicates_removed,
            failed = stats.failed_downloads,
            "Harvest completed"
        );

        Ok(stats)
    }

    /// Runs the download pass over the current documents and keeps the survivors
    pub async fn download(&mut self) -> Result<DownloadReport, HarvestError> {
        let downloader = DownloadCoordinator::new(
            self.client.clone(),
            &self.config.download.documents_dir,
            self.base_url.clone(),
            self.config.download.max_concurrent_downloads as usize,
        );

        let pass = downloader.run(&self.documents).await?;
        self.documents = pass.survivors;

        Ok(pass.report)
    }

    /// Replaces the current documents, e.g. with a loaded snapshot
    pub fn set_documents(&mut self, documents: CategoryResultSet) {
        self.documents = documents;
    }

    /// The category → records mapping of the run
    pub fn documents(&self) -> &CategoryResultSet {
        &self.documents
    }

    /// Flat list of all records, category order then list order
    pub fn all_documents(&self) -> Vec<DocumentRecord> {
        self.documents.all_documents()
    }

    /// Consumes the coordinator and returns the mapping
    pub fn into_documents(self) -> CategoryResultSet {
        self.documents
    }
}

/// Runs a complete harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use netco_harvest::config::Config;
/// use netco_harvest::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (documents, stats) = run_harvest(Config::default()).await?;
/// println!("{} documents, {} duplicates", documents.total_documents(), stats.duplicates_removed);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: Config,
) -> Result<(CategoryResultSet, HarvestStatistics), HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    let stats = coordinator.run().await?;
    Ok((coordinator.into_documents(), stats))
}
