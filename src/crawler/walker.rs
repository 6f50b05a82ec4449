//! Category walker
//!
//! Walks each category's listing pages in order. The page count comes from
//! the category's local bootstrap page; pages are then fetched live from
//! `{base_url}/{category_key}?pagenumber={n}` one at a time.

use crate::catalog::{Category, CategoryResultSet, DocumentRecord};
use crate::crawler::fetcher::{fetch_page, FetchResult};
use crate::crawler::parser::{extract_documents, parse_max_page};
use crate::HarvestError;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Walks the listing pages of every category
pub struct CategoryWalker {
    client: Client,
    base_url: String,
    html_dir: PathBuf,
    documents_dir: PathBuf,
}

impl CategoryWalker {
    /// Creates a walker
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for page fetches
    /// * `base_url` - Site root that category keys are appended to
    /// * `html_dir` - Directory holding `<category-key>.html` bootstrap pages
    /// * `documents_dir` - Documents root; category folders are created under it
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        html_dir: impl Into<PathBuf>,
        documents_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            html_dir: html_dir.into(),
            documents_dir: documents_dir.into(),
        }
    }

    /// URL of one listing page
    pub fn page_url(&self, category: Category, page: u32) -> String {
        format!(
            "{}/{}?pagenumber={}",
            self.base_url.trim_end_matches('/'),
            category.key(),
            page
        )
    }

    /// Path of the bootstrap page for a category
    pub fn bootstrap_path(&self, category: Category) -> PathBuf {
        self.html_dir.join(format!("{}.html", category.key()))
    }

    /// Walks every category in order and collects its records
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryResultSet)` - Records per category, in page discovery order
    /// * `Err(HarvestError)` - A category folder could not be created or a
    ///   bootstrap page could not be read
    pub async fn walk_all(&self) -> Result<CategoryResultSet, HarvestError> {
        let mut results = CategoryResultSet::new();

        for category in Category::ALL {
            let documents = self.walk_category(category).await?;
            results.insert(category, documents);
        }

        Ok(results)
    }

    /// Walks one category's pages
    ///
    /// Page-level failures are logged and skipped. A page that parses but
    /// yields no records ends the category early.
    pub async fn walk_category(&self, category: Category) -> Result<Vec<DocumentRecord>, HarvestError> {
        ensure_dir(&self.documents_dir.join(category.display_folder()))?;

        let max_page = self.discover_page_count(category)?;
        tracing::info!(category = %category, max_page, "Walking category");

        let mut documents = Vec::new();

        for page in 1..=max_page {
            let url = self.page_url(category, page);
            tracing::info!(category = %category, "Processing page {}/{}", page, max_page);

            let body = match fetch_page(&self.client, &url).await {
                FetchResult::Success { body, .. } => body,
                FetchResult::HttpError { status_code } => {
                    tracing::warn!(
                        category = %category,
                        page,
                        status_code,
                        "Listing page returned non-success status, skipping"
                    );
                    continue;
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!(category = %category, page, %error, "Failed to fetch listing page, skipping");
                    continue;
                }
            };

            let page_documents = match extract_documents(&body, category) {
                Ok(docs) => docs,
                Err(e) => {
                    tracing::warn!(category = %category, page, "Failed to parse listing page: {}", e);
                    continue;
                }
            };

            if page_documents.is_empty() {
                tracing::info!(category = %category, page, "Page has no documents, stopping pagination");
                break;
            }

            tracing::info!(
                category = %category,
                "Found {} documents (page {}/{})",
                page_documents.len(),
                page,
                max_page
            );
            documents.extend(page_documents);
        }

        Ok(documents)
    }

    /// Reads the bootstrap page of a category and returns its page count
    fn discover_page_count(&self, category: Category) -> Result<u32, HarvestError> {
        let path = self.bootstrap_path(category);
        let html = std::fs::read_to_string(&path).map_err(|source| HarvestError::BootstrapRead {
            category: category.key().to_string(),
            path: path.clone(),
            source,
        })?;

        Ok(parse_max_page(&html))
    }
}

/// Creates a directory and its parents, mapping failure to a fatal error
pub(crate) fn ensure_dir(path: &Path) -> Result<(), HarvestError> {
    std::fs::create_dir_all(path).map_err(|source| HarvestError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
