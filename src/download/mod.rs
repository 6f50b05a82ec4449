//! Download module for fetching collected documents
//!
//! This module contains:
//! - The download coordinator (dedup pass + bounded worker pool)
//! - Atomic single-file fetch through a staging file
//! - Shared progress accounting

mod coordinator;
mod file;
mod progress;

pub use coordinator::{DownloadCoordinator, DownloadPass, DownloadReport, DEFAULT_MAX_CONCURRENT};
pub use file::{download_file, staging_path_for, DownloadError, STAGING_DIR};
pub use progress::{Progress, ProgressTracker};
