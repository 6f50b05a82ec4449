//! Duplicate detection for collected records
//!
//! Two records are duplicates only when name, download URL, category and
//! local path all match exactly. Among duplicates the record with fewer empty
//! optional fields survives; ties keep the record seen first.

mod index;

pub use index::{DuplicateIndex, Resolution};

use crate::catalog::{Category, DocumentRecord};

/// Exact identity of a record for duplicate detection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub name: String,
    pub download_url: String,
    pub category: Category,
    pub local_path: String,
}

impl IdentityKey {
    pub fn of(record: &DocumentRecord) -> Self {
        Self {
            name: record.name.clone(),
            download_url: record.download_url.clone(),
            category: record.category,
            local_path: record.local_path.clone(),
        }
    }
}
