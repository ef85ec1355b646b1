//! Idempotent acquisition of WordPress releases and the SQLite driver.
//!
//! Acquisition is cache-first: if the target directory already exists
//! under the pressbox home it is reused as-is; otherwise the archive is
//! downloaded into a staging directory, extracted, and renamed into place
//! so a partially downloaded asset is never observed at the final path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use crate::errors::{PressboxError, PressboxResult};
use crate::releases;
use crate::runtime::constants::sqlite;
use crate::runtime::layout::FilesystemLayout;

/// Ensures release assets exist on local disk.
#[async_trait]
pub trait AssetProvisioner: Send + Sync {
    /// Ensure the given WordPress release is extracted on disk and return
    /// its root directory. No-op if already present.
    async fn ensure_wordpress(&self, version: &str) -> PressboxResult<PathBuf>;

    /// Ensure the bundled SQLite database driver is extracted on disk and
    /// return its directory. No-op if already present.
    async fn ensure_sqlite_driver(&self) -> PressboxResult<PathBuf>;
}

/// Downloads assets over HTTPS into the pressbox home.
pub struct HttpAssetProvisioner {
    layout: FilesystemLayout,
    client: reqwest::Client,
}

impl HttpAssetProvisioner {
    pub fn new(layout: FilesystemLayout) -> Self {
        Self {
            layout,
            client: reqwest::Client::new(),
        }
    }

    async fn download_and_extract(
        &self,
        url: &str,
        expected_size: Option<u64>,
        target: &Path,
    ) -> PressboxResult<()> {
        let parent = target.parent().ok_or_else(|| {
            PressboxError::Internal(format!("asset target {} has no parent", target.display()))
        })?;
        fs::create_dir_all(parent)
            .map_err(|e| PressboxError::Storage(format!("failed to create {}: {e}", parent.display())))?;

        // Stage next to the target so the final rename stays on one
        // filesystem.
        let staging = tempfile::tempdir_in(parent)
            .map_err(|e| PressboxError::Storage(format!("failed to create staging dir: {e}")))?;

        info!(url, "downloading");
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PressboxError::Download(format!("failed to fetch {url}: {e}")))?;

        let mut archive_bytes = Vec::with_capacity(expected_size.unwrap_or(0) as usize);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PressboxError::Download(format!("failed to read {url}: {e}")))?
        {
            archive_bytes.extend_from_slice(&chunk);
        }
        debug!(bytes = archive_bytes.len(), "download complete");

        let decoder = GzDecoder::new(io::Cursor::new(archive_bytes));
        Archive::new(decoder)
            .unpack(staging.path())
            .map_err(|e| PressboxError::Download(format!("failed to extract {url}: {e}")))?;

        let root = archive_root(staging.path())?;
        fs::rename(&root, target).map_err(|e| {
            PressboxError::Storage(format!("failed to move asset into {}: {e}", target.display()))
        })?;

        info!(target = %target.display(), "asset ready");
        Ok(())
    }
}

/// The archives wrap their payload in a single top-level directory
/// (`wordpress/`, `sqlite-database-integration-main/`); find it.
fn archive_root(staging: &Path) -> PressboxResult<PathBuf> {
    let mut entries = fs::read_dir(staging)
        .map_err(|e| PressboxError::Storage(format!("failed to read staging dir: {e}")))?
        .flatten();

    match (entries.next(), entries.next()) {
        (Some(only), None) if only.path().is_dir() => Ok(only.path()),
        _ => Err(PressboxError::Download(
            "unexpected archive layout: expected a single top-level directory".to_string(),
        )),
    }
}

#[async_trait]
impl AssetProvisioner for HttpAssetProvisioner {
    async fn ensure_wordpress(&self, version: &str) -> PressboxResult<PathBuf> {
        let release = releases::details(version)?;
        let target = self.layout.wordpress_version_dir(version);
        if target.is_dir() {
            debug!(version, "wordpress release already present");
            return Ok(target);
        }
        self.download_and_extract(release.url, Some(release.size), &target)
            .await?;
        Ok(target)
    }

    async fn ensure_sqlite_driver(&self) -> PressboxResult<PathBuf> {
        let target = self.layout.sqlite_driver_dir();
        if target.is_dir() {
            debug!("sqlite driver already present");
            return Ok(target);
        }
        self.download_and_extract(sqlite::DOWNLOAD_URL, None, &target)
            .await?;
        Ok(target)
    }
}
