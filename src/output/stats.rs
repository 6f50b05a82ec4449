//! Statistics for a harvest run
//!
//! This module builds the final summary of a run (or of a loaded snapshot)
//! and prints it.

use crate::catalog::{Category, CategoryResultSet};
use crate::download::DownloadReport;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Harvest statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestStatistics {
    /// Number of records per category, in category order
    pub per_category: BTreeMap<Category, usize>,

    /// Total number of records after duplicate removal
    pub total_documents: usize,

    /// Records removed as duplicates
    pub duplicates_removed: usize,

    /// Records whose download failed
    pub failed_downloads: usize,

    /// Files fetched during the run
    pub downloaded: usize,

    /// Records skipped because the destination already existed
    pub exists_skipped: usize,

    /// When the run started (None for snapshot statistics)
    pub started_at: Option<DateTime<Utc>>,

    /// When the run finished (None for snapshot statistics)
    pub finished_at: Option<DateTime<Utc>>,
}

impl HarvestStatistics {
    /// Statistics of a result set alone, e.g. a loaded snapshot
    pub fn from_documents(documents: &CategoryResultSet) -> Self {
        let per_category = documents
            .iter()
            .map(|(category, docs)| (category, docs.len()))
            .collect();

        Self {
            per_category,
            total_documents: documents.total_documents(),
            ..Self::default()
        }
    }

    /// Statistics of a completed run
    pub fn from_run(
        documents: &CategoryResultSet,
        report: &DownloadReport,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            duplicates_removed: report.duplicates,
            failed_downloads: report.failed,
            downloaded: report.downloaded,
            exists_skipped: report.exists_skipped,
            started_at: Some(started_at),
            finished_at: Some(finished_at),
            ..Self::from_documents(documents)
        }
    }

    /// Run duration in seconds, when both timestamps are known
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => Some((finished - started).num_seconds()),
            _ => None,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Documents by Category:");
    for (category, count) in &stats.per_category {
        println!("  - {}: {} documents", category.display_folder(), count);
    }
    println!();

    println!("Overview:");
    println!("  Documents kept: {}", stats.total_documents);
    println!("  Duplicates removed: {}", stats.duplicates_removed);
    println!("  Failed downloads: {}", stats.failed_downloads);
    println!("  Downloaded: {}", stats.downloaded);
    println!("  Already present: {}", stats.exists_skipped);

    for line in run_time_lines(stats) {
        println!("{}", line);
    }
    println!();

    println!("Duplicates share name, download URL, category and file path;");
    println!("the entry with the fewest empty fields is kept.");
}

/// Start, finish and duration lines of a run; empty for snapshot statistics
fn run_time_lines(stats: &HarvestStatistics) -> Vec<String> {
    let (Some(started), Some(finished), Some(duration)) =
        (stats.started_at, stats.finished_at, stats.duration_seconds())
    else {
        return Vec::new();
    };

    vec![
        format!("  Run started: {}", started.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("  Run finished: {}", finished.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("  Duration: {}s", duration),
    ]
}
