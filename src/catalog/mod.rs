//! Catalog data model
//!
//! This module defines the records produced by a harvest run:
//! - `Category`: the closed set of six document classifications
//! - `DocumentRecord`: one listed document with its metadata and destination path
//! - `CategoryResultSet`: the ordered category → records mapping handed to consumers

mod category;
mod document;
mod result_set;

pub use category::{display_folder_for_key, Category};
pub use document::{local_path_for, sanitize_file_name, DocumentRecord};
pub use result_set::CategoryResultSet;
