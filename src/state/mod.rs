//! State module for tracking download outcomes
//!
//! `DownloadState` is the terminal outcome of a single record in the
//! download pass.

mod download_state;

pub use download_state::DownloadState;
