/// Terminal outcomes of a record in a download pass
///
/// Every record offered to the pass ends in exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DownloadState {
    // ===== Skip States =====
    /// Record lost the dedup resolution against another record with the same identity
    DuplicateSkipped,

    /// Destination file already exists (or is claimed by another record this run)
    ExistsSkipped,

    // ===== Success States =====
    /// File was fetched and moved into place
    Downloaded,

    // ===== Error States =====
    /// Fetch failed (network error, non-success status or write error)
    Failed,
}

impl DownloadState {
    /// Returns true if this outcome counts toward the "completed" progress total
    ///
    /// Downloads, exists-skips and duplicate-skips all count; failures do not.
    pub fn counts_as_completed(&self) -> bool {
        matches!(
            self,
            Self::Downloaded | Self::ExistsSkipped | Self::DuplicateSkipped
        )
    }
}
