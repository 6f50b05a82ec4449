use crate::catalog::CategoryResultSet;
use crate::HarvestError;
use std::path::Path;

/// Writes the category → records mapping as pretty-printed JSON
///
/// The parent directory is created if needed.
pub fn save_snapshot(documents: &CategoryResultSet, path: &Path) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| HarvestError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(documents)?;
    std::fs::write(path, json)?;

    tracing::info!(path = %path.display(), "Saved snapshot");
    Ok(())
}

/// Reads a snapshot written by `save_snapshot`
pub fn load_snapshot(path: &Path) -> Result<CategoryResultSet, HarvestError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
