use crate::catalog::{CategoryResultSet, DocumentRecord};
use crate::dedup::IdentityKey;
use std::collections::HashMap;

/// Outcome of offering a record to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// First record seen for its identity key
    Kept,

    /// Record won against the kept record, which it replaced in place
    Superseded {
        /// The evicted record
        previous: DocumentRecord,
    },

    /// Record lost against the kept record and was discarded
    Duplicate,
}

/// Identity key → currently kept record
///
/// Survivors live in slots ordered by the first time their key was seen, so
/// iteration is deterministic for a given input order. A winner replaces the
/// loser in its slot.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    slots: Vec<DocumentRecord>,
    positions: HashMap<IdentityKey, usize>,
    offered: usize,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a record against the current survivor for its key
    ///
    /// The record with fewer empty optional fields wins; on a tie the record
    /// already kept stays.
    pub fn offer(&mut self, record: DocumentRecord) -> Resolution {
        self.offered += 1;
        let key = IdentityKey::of(&record);

        let Some(&slot) = self.positions.get(&key) else {
            self.positions.insert(key, self.slots.len());
            self.slots.push(record);
            return Resolution::Kept;
        };

        let kept = &mut self.slots[slot];
        if record.empty_field_count() < kept.empty_field_count() {
            let previous = std::mem::replace(kept, record);
            Resolution::Superseded { previous }
        } else {
            Resolution::Duplicate
        }
    }

    /// Number of surviving records
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of records collapsed into another record so far
    pub fn duplicate_count(&self) -> usize {
        self.offered - self.slots.len()
    }

    /// The survivor currently kept for a key
    pub fn get(&self, key: &IdentityKey) -> Option<&DocumentRecord> {
        self.positions.get(key).map(|&slot| &self.slots[slot])
    }

    /// Survivors in first-seen order
    pub fn survivors(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.slots.iter()
    }

    /// Rebuilds the per-category result set from the survivors only
    pub fn into_result_set(self) -> CategoryResultSet {
        self.slots.into_iter().collect()
    }
}
