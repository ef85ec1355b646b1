#![allow(dead_code)]

//! Test doubles for the execution-environment and provisioning
//! collaborators, plus on-disk fixtures.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use pressbox::assets::AssetProvisioner;
use pressbox::errors::{PressboxError, PressboxResult};
use pressbox::php::{
    FileStore, Mounter, PhpFactory, PhpRequest, PhpResponse, PhpRuntime, RequestHandlerConfig,
    RequestRunner,
};
use pressbox::runtime::layout::FilesystemLayout;
use pressbox::runtime::options::PhpVersion;

// ============================================================================
// FAKE PHP RUNTIME
// ============================================================================

/// In-memory execution environment that records every interaction.
///
/// Reads resolve through the recorded mounts onto the host filesystem,
/// with later mounts shadowing earlier ones, so orchestration code that
/// reads files it just mounted behaves as it would against a real engine.
#[derive(Debug, Default)]
pub struct FakePhp {
    pub mounts: Mutex<Vec<(PathBuf, PathBuf)>>,
    pub writes: Mutex<BTreeMap<PathBuf, String>>,
    pub dirs: Mutex<BTreeSet<PathBuf>>,
    pub requests: Mutex<Vec<PhpRequest>>,
    pub cwd: Mutex<Option<PathBuf>>,
}

impl FakePhp {
    /// Map a virtual path to a host path through the mount table.
    fn resolve_host(&self, path: &Path) -> Option<PathBuf> {
        let mounts = self.mounts.lock().unwrap();
        for (source, target) in mounts.iter().rev() {
            if let Ok(relative) = path.strip_prefix(target) {
                return Some(source.join(relative));
            }
        }
        None
    }

    pub fn mounts(&self) -> Vec<(PathBuf, PathBuf)> {
        self.mounts.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<PhpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn written(&self, path: &Path) -> Option<String> {
        self.writes.lock().unwrap().get(path).cloned()
    }

    /// Mounts whose source is the given path.
    pub fn mounts_of(&self, source: &Path) -> Vec<PathBuf> {
        self.mounts()
            .into_iter()
            .filter(|(mount_source, _)| mount_source == source)
            .map(|(_, target)| target)
            .collect()
    }
}

#[async_trait]
impl Mounter for FakePhp {
    async fn mount(&self, source: &Path, target: &Path) -> PressboxResult<()> {
        self.mounts
            .lock()
            .unwrap()
            .push((source.to_path_buf(), target.to_path_buf()));
        Ok(())
    }
}

#[async_trait]
impl FileStore for FakePhp {
    async fn write_file(&self, path: &Path, contents: &str) -> PressboxResult<()> {
        self.writes
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    async fn read_file_to_string(&self, path: &Path) -> PressboxResult<String> {
        if let Some(contents) = self.writes.lock().unwrap().get(path) {
            return Ok(contents.clone());
        }
        if let Some(host_path) = self.resolve_host(path) {
            return fs::read_to_string(&host_path).map_err(|e| {
                PressboxError::Runtime(format!("failed to read {}: {e}", host_path.display()))
            });
        }
        Err(PressboxError::Runtime(format!(
            "no such file: {}",
            path.display()
        )))
    }

    async fn file_exists(&self, path: &Path) -> PressboxResult<bool> {
        if self.writes.lock().unwrap().contains_key(path)
            || self.dirs.lock().unwrap().contains(path)
        {
            return Ok(true);
        }
        Ok(self.resolve_host(path).is_some_and(|host| host.exists()))
    }

    async fn is_dir(&self, path: &Path) -> PressboxResult<bool> {
        if self.dirs.lock().unwrap().contains(path) {
            return Ok(true);
        }
        Ok(self.resolve_host(path).is_some_and(|host| host.is_dir()))
    }

    async fn mkdir_tree(&self, path: &Path) -> PressboxResult<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}

#[async_trait]
impl RequestRunner for FakePhp {
    async fn request(&self, request: PhpRequest) -> PressboxResult<PhpResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(PhpResponse {
            status: 200,
            body: Vec::new(),
        })
    }
}

#[async_trait]
impl PhpRuntime for FakePhp {
    async fn chdir(&self, path: &Path) -> PressboxResult<()> {
        *self.cwd.lock().unwrap() = Some(path.to_path_buf());
        Ok(())
    }
}

// ============================================================================
// FAKE FACTORY AND PROVISIONER
// ============================================================================

/// Factory spy: counts loads and records the handler config it saw.
#[derive(Default)]
pub struct FakeFactory {
    pub load_calls: AtomicUsize,
    pub last_handler: Mutex<Option<RequestHandlerConfig>>,
}

#[async_trait]
impl PhpFactory for FakeFactory {
    type Runtime = FakePhp;

    async fn load(
        &self,
        _version: PhpVersion,
        handler: RequestHandlerConfig,
    ) -> PressboxResult<Self::Runtime> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_handler.lock().unwrap() = Some(handler);
        Ok(FakePhp::default())
    }
}

/// Provisioner that seeds fixture assets on first request and counts how
/// often it actually had to "download".
pub struct FakeAssets {
    layout: FilesystemLayout,
    pub wordpress_downloads: AtomicUsize,
    pub sqlite_downloads: AtomicUsize,
}

impl FakeAssets {
    pub fn new(layout: FilesystemLayout) -> Self {
        Self {
            layout,
            wordpress_downloads: AtomicUsize::new(0),
            sqlite_downloads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AssetProvisioner for FakeAssets {
    async fn ensure_wordpress(&self, version: &str) -> PressboxResult<PathBuf> {
        let target = self.layout.wordpress_version_dir(version);
        if !target.is_dir() {
            seed_release(&self.layout, version);
            self.wordpress_downloads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(target)
    }

    async fn ensure_sqlite_driver(&self) -> PressboxResult<PathBuf> {
        let target = self.layout.sqlite_driver_dir();
        if !target.is_dir() {
            seed_sqlite_driver(&self.layout);
            self.sqlite_downloads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(target)
    }
}

// ============================================================================
// ON-DISK FIXTURES
// ============================================================================

/// Isolated pressbox home plus a project directory.
pub struct TestContext {
    pub layout: FilesystemLayout,
    _home: TempDir,
    pub project_root: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        let project_root = TempDir::new().expect("failed to create temp project root");
        let layout = FilesystemLayout::new(home.path().to_path_buf());
        layout.prepare().expect("failed to prepare layout");
        Self {
            layout,
            _home: home,
            project_root,
        }
    }

    /// Create a named project directory so tests control the basename.
    pub fn project_dir(&self, name: &str) -> PathBuf {
        let dir = self.project_root.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}

/// Lay down a minimal extracted release tree.
pub fn seed_release(layout: &FilesystemLayout, version: &str) {
    let root = layout.wordpress_version_dir(version);
    fs::create_dir_all(root.join("wp-content/plugins")).unwrap();
    fs::create_dir_all(root.join("wp-content/themes/twentytwentyfour")).unwrap();
    fs::write(root.join("index.php"), "<?php // wordpress\n").unwrap();
    fs::write(
        root.join("wp-config-sample.php"),
        "<?php\n$table_prefix = 'wp_';\n",
    )
    .unwrap();
    fs::write(root.join("wp-content/plugins/index.php"), "<?php\n").unwrap();
    fs::write(
        root.join("wp-content/themes/twentytwentyfour/style.css"),
        "/*\nTheme Name: Twenty Twenty-Four\n*/\n",
    )
    .unwrap();
}

/// Lay down a minimal SQLite driver with its db.php template.
pub fn seed_sqlite_driver(layout: &FilesystemLayout) {
    let root = layout.sqlite_driver_dir();
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join("db.copy"),
        "<?php\n$path = '{SQLITE_IMPLEMENTATION_FOLDER_PATH}';\n$plugin = '{SQLITE_PLUGIN}';\n",
    )
    .unwrap();
    fs::write(root.join("load.php"), "<?php\n").unwrap();
}

/// A plugin project with a recognizable header.
pub fn seed_plugin_project(dir: &Path) {
    fs::write(
        dir.join("my-plugin.php"),
        "<?php\n/**\n * Plugin Name: My Plugin\n */\n",
    )
    .unwrap();
}

/// A theme project with a recognizable header.
pub fn seed_theme_project(dir: &Path) {
    fs::write(dir.join("style.css"), "/*\nTheme Name: My Theme\n*/\n").unwrap();
    fs::write(dir.join("index.php"), "<?php\n").unwrap();
}

/// A wp-content project (plugins/ and themes/ subtrees).
pub fn seed_wp_content_project(dir: &Path) {
    fs::create_dir_all(dir.join("plugins")).unwrap();
    fs::create_dir_all(dir.join("themes")).unwrap();
}

/// A core checkout project.
pub fn seed_core_project(dir: &Path) {
    fs::create_dir_all(dir.join("wp-includes")).unwrap();
    fs::create_dir_all(dir.join("wp-admin")).unwrap();
    fs::create_dir_all(dir.join("wp-content/plugins")).unwrap();
    fs::create_dir_all(dir.join("wp-content/themes")).unwrap();
    fs::write(dir.join("wp-load.php"), "<?php\n").unwrap();
    fs::write(
        dir.join("wp-config-sample.php"),
        "<?php\n$table_prefix = 'wp_';\n",
    )
    .unwrap();
}
