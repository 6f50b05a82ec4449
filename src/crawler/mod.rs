//! Crawler module for listing-page fetching and extraction
//!
//! This module contains the collection side of a harvest, including:
//! - HTTP client construction and page fetching
//! - HTML extraction of document rows and pager markers
//! - The category walker
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod walker;

pub use coordinator::{run_harvest, Coordinator};
pub use fetcher::{build_http_client, fetch_page, user_agent_string, FetchResult};
pub use parser::{extract_documents, parse_max_page};
pub use walker::CategoryWalker;
