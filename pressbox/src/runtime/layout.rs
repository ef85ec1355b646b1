//! On-disk layout of the pressbox home directory.

use std::path::{Path, PathBuf};

use dirs::home_dir;
use sha2::{Digest, Sha256};

use crate::errors::{PressboxError, PressboxResult};
use crate::runtime::constants::{dirs as const_dirs, envs};
use crate::util;

/// Filesystem layout rooted at the pressbox home directory.
///
/// # Directory Structure
///
/// ```text
/// ~/.pressbox/
/// ├── wordpress-versions/
/// │   ├── 6.6/                         # extracted release trees
/// │   └── nightly/
/// ├── sqlite-database-integration/     # bundled SQLite driver
/// └── wp-content/
///     └── {basename}-{hash}/           # per-project content caches
/// ```
///
/// Per-project caches survive across runs and are reused, not recreated,
/// unless deleted externally.
#[derive(Clone, Debug)]
pub struct FilesystemLayout {
    home_dir: PathBuf,
}

impl FilesystemLayout {
    pub fn new(home_dir: PathBuf) -> Self {
        Self { home_dir }
    }

    /// Resolve the home directory from `PRESSBOX_HOME` or `~/.pressbox`.
    pub fn from_env() -> Self {
        let home = std::env::var(envs::PRESSBOX_HOME)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let mut path = home_dir().unwrap_or_else(|| PathBuf::from("."));
                path.push(const_dirs::PRESSBOX_DIR);
                path
            });
        Self::new(home)
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Extracted release trees: ~/.pressbox/wordpress-versions
    pub fn wordpress_versions_dir(&self) -> PathBuf {
        self.home_dir.join(const_dirs::WORDPRESS_VERSIONS_DIR)
    }

    /// Extracted tree for one release: ~/.pressbox/wordpress-versions/{version}
    pub fn wordpress_version_dir(&self, version: &str) -> PathBuf {
        self.wordpress_versions_dir().join(version)
    }

    /// The bundled SQLite driver: ~/.pressbox/sqlite-database-integration
    pub fn sqlite_driver_dir(&self) -> PathBuf {
        self.home_dir
            .join(crate::runtime::constants::sqlite::PLUGIN_NAME)
    }

    /// Base directory for per-project content caches: ~/.pressbox/wp-content
    pub fn wp_content_base_dir(&self) -> PathBuf {
        self.home_dir.join(const_dirs::WP_CONTENT_DIR)
    }

    /// Per-project content cache: ~/.pressbox/wp-content/{basename}-{hash}
    pub fn project_content_dir(&self, project_path: &Path) -> PathBuf {
        self.wp_content_base_dir()
            .join(project_identity(project_path))
    }

    /// Initialize the filesystem structure.
    pub fn prepare(&self) -> PressboxResult<()> {
        std::fs::create_dir_all(&self.home_dir)
            .map_err(|e| PressboxError::Storage(format!("failed to create home: {e}")))?;

        std::fs::create_dir_all(self.wordpress_versions_dir()).map_err(|e| {
            PressboxError::Storage(format!("failed to create wordpress-versions dir: {e}"))
        })?;

        std::fs::create_dir_all(self.wp_content_base_dir())
            .map_err(|e| PressboxError::Storage(format!("failed to create wp-content dir: {e}")))?;

        Ok(())
    }
}

/// Directory-name-safe identity for a project path.
///
/// Combines the path's final component with a hash of the full path, so
/// two projects sharing a basename never collide and repeated calls for
/// the same path are stable across runs.
pub fn project_identity(project_path: &Path) -> String {
    let basename = util::dir_basename(project_path);
    let mut hasher = Sha256::new();
    hasher.update(project_path.as_os_str().as_encoded_bytes());
    format!("{basename}-{}", hex::encode(hasher.finalize()))
}
