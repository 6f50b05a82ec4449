use crate::catalog::Category;
use serde::{Deserialize, Serialize};

/// Characters that are not allowed in a destination file name
const RESERVED_FILE_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// One document listed in a category table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Display title (link text of the first cell, never empty)
    pub name: String,

    /// Free-text file size
    pub size: String,

    /// Free-text download count
    pub downloads: String,

    /// Free-text modification date
    pub modified: String,

    /// Free-text uploader
    pub uploaded_by: String,

    /// Link target, verbatim from the listing (may be relative)
    pub download_url: String,

    /// Category the record was listed under
    pub category: Category,

    /// Destination path relative to the documents root
    #[serde(rename = "file_path")]
    pub local_path: String,
}

impl DocumentRecord {
    /// Creates a record, deriving `local_path` from the category and name
    pub fn new(
        category: Category,
        name: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let local_path = local_path_for(category, &name);
        Self {
            name,
            size: String::new(),
            downloads: String::new(),
            modified: String::new(),
            uploaded_by: String::new(),
            download_url: download_url.into(),
            category,
            local_path,
        }
    }

    /// Sanitized file name of this record
    pub fn file_name(&self) -> String {
        sanitize_file_name(&self.name)
    }

    /// Number of empty optional fields (size, downloads, modified, uploaded_by)
    pub fn empty_field_count(&self) -> usize {
        [&self.size, &self.downloads, &self.modified, &self.uploaded_by]
            .iter()
            .filter(|field| field.is_empty())
            .count()
    }
}

/// Replaces characters that are invalid in file names with `_`
///
/// ```
/// use netco_harvest::catalog::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("BCTC Q1/2023: ban *moi*"), "BCTC Q1_2023_ ban _moi_");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if RESERVED_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Destination path of a document: `<display folder>/<sanitized name>`
pub fn local_path_for(category: Category, name: &str) -> String {
    format!("{}/{}", category.display_folder(), sanitize_file_name(name))
}
