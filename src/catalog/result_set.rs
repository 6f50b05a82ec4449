use crate::catalog::{Category, DocumentRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category → ordered document list, the hand-off artifact of a run
///
/// Keys iterate in category order so summaries and snapshots are
/// reproducible. Serializes as a plain JSON object keyed by category key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryResultSet {
    documents: BTreeMap<Category, Vec<DocumentRecord>>,
}

impl CategoryResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the list for a category, replacing any previous list
    pub fn insert(&mut self, category: Category, documents: Vec<DocumentRecord>) {
        self.documents.insert(category, documents);
    }

    /// Appends a single record to its category's list
    pub fn push(&mut self, record: DocumentRecord) {
        self.documents
            .entry(record.category)
            .or_default()
            .push(record);
    }

    pub fn get(&self, category: Category) -> Option<&[DocumentRecord]> {
        self.documents.get(&category).map(Vec::as_slice)
    }

    /// Iterates categories in order with their document lists
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[DocumentRecord])> {
        self.documents
            .iter()
            .map(|(category, docs)| (*category, docs.as_slice()))
    }

    /// Iterates every record, category order then list order
    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.values().flatten()
    }

    /// Number of categories present
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of records across all categories
    pub fn total_documents(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }

    /// Flat list of every record, category order then list order
    pub fn all_documents(&self) -> Vec<DocumentRecord> {
        self.records().cloned().collect()
    }
}

impl FromIterator<DocumentRecord> for CategoryResultSet {
    fn from_iter<I: IntoIterator<Item = DocumentRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.push(record);
        }
        set
    }
}
