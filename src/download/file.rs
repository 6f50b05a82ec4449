//! Single-file fetch with atomic completion
//!
//! The body is streamed into a staging file and renamed onto `<dest>` only
//! after the whole body was written. Staging files live under
//! `<documents root>/.partial/`, which mirrors the category folders but is
//! never itself a destination, so a staging file cannot land on another
//! document's path. A failed fetch removes its staging file.

use reqwest::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Errors for a single file fetch
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Directory under the documents root that holds in-flight downloads
pub const STAGING_DIR: &str = ".partial";

/// Staging path of a document while its download is in flight
///
/// `local_path` is the record's `<display folder>/<sanitized name>`.
pub fn staging_path_for(documents_root: &Path, local_path: &str) -> PathBuf {
    documents_root.join(STAGING_DIR).join(local_path)
}

/// Downloads `url` into `dest` through the staging file `tmp_path`
///
/// `tmp_path` must be on the same filesystem as `dest`.
///
/// # Returns
///
/// * `Ok(u64)` - Number of bytes written
/// * `Err(DownloadError)` - Fetch or write failed; `dest` is untouched
pub async fn download_file(
    client: &Client,
    url: &str,
    dest: &Path,
    tmp_path: &Path,
) -> Result<u64, DownloadError> {
    for dir in [dest.parent(), tmp_path.parent()].into_iter().flatten() {
        fs::create_dir_all(dir).await.map_err(|source| DownloadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let result = write_to_temp(client, url, tmp_path).await;

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(tmp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %tmp_path.display(), "Failed to remove temp file: {}", cleanup);
                }
            }
            return Err(e);
        }
    };

    fs::rename(tmp_path, dest).await.map_err(|source| DownloadError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(bytes)
}

/// Streams the response body into the temp file
async fn write_to_temp(client: &Client, url: &str, tmp_path: &Path) -> Result<u64, DownloadError> {
    let io_err = |source: std::io::Error| DownloadError::Io {
        path: tmp_path.to_path_buf(),
        source,
    };
    let http_err = |source: reqwest::Error| DownloadError::Http {
        url: url.to_string(),
        source,
    };

    let mut response = client.get(url).send().await.map_err(http_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut file = fs::File::create(tmp_path).await.map_err(io_err)?;
    let mut written = 0u64;

    while let Some(chunk) = response.chunk().await.map_err(http_err)? {
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(io_err)?;

    Ok(written)
}
