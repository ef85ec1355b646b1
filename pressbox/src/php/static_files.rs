//! Request-path classification for the embedded web server.

use std::path::Path;

use tracing::warn;

use super::FileStore;
use crate::errors::PressboxResult;

/// PHP scripts are never served as static files, including PATH_INFO-style
/// URLs such as `/index.php/some/route`.
pub fn seems_like_php_file(path: &str) -> bool {
    path.ends_with(".php") || path.contains(".php/")
}

/// Whether `request_path` should be served as a static file.
///
/// True only for existing, non-directory, non-PHP paths under the document
/// root. Probe failures are logged and treated as "not a static file" so a
/// broken probe never takes down request handling.
pub async fn is_static_file_path<S: FileStore + ?Sized>(
    store: &S,
    document_root: &Path,
    request_path: &str,
) -> bool {
    let full_path = document_root.join(request_path.trim_start_matches('/'));
    match probe(store, &full_path).await {
        Ok(is_static) => is_static,
        Err(err) => {
            warn!(path = %full_path.display(), "static file probe failed: {err}");
            false
        }
    }
}

async fn probe<S: FileStore + ?Sized>(store: &S, path: &Path) -> PressboxResult<bool> {
    Ok(store.file_exists(path).await?
        && !store.is_dir(path).await?
        && !seems_like_php_file(&path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PressboxError;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    /// FileStore over a fixed set of paths; probes against `broken` fail.
    #[derive(Default)]
    struct ProbeStore {
        files: BTreeSet<PathBuf>,
        dirs: BTreeSet<PathBuf>,
        broken: BTreeSet<PathBuf>,
    }

    #[async_trait]
    impl FileStore for ProbeStore {
        async fn write_file(&self, _path: &Path, _contents: &str) -> PressboxResult<()> {
            unimplemented!()
        }

        async fn read_file_to_string(&self, _path: &Path) -> PressboxResult<String> {
            unimplemented!()
        }

        async fn file_exists(&self, path: &Path) -> PressboxResult<bool> {
            if self.broken.contains(path) {
                return Err(PressboxError::Runtime("probe failed".to_string()));
            }
            Ok(self.files.contains(path) || self.dirs.contains(path))
        }

        async fn is_dir(&self, path: &Path) -> PressboxResult<bool> {
            Ok(self.dirs.contains(path))
        }

        async fn mkdir_tree(&self, _path: &Path) -> PressboxResult<()> {
            unimplemented!()
        }
    }

    const DOCROOT: &str = "/var/www/html";

    #[test]
    fn php_paths_are_recognized() {
        assert!(seems_like_php_file("/var/www/html/index.php"));
        assert!(seems_like_php_file("/var/www/html/index.php/route"));
        assert!(!seems_like_php_file("/var/www/html/logo.png"));
    }

    #[tokio::test]
    async fn existing_regular_file_is_static() {
        let mut store = ProbeStore::default();
        store.files.insert(PathBuf::from("/var/www/html/logo.png"));
        assert!(is_static_file_path(&store, Path::new(DOCROOT), "/logo.png").await);
    }

    #[tokio::test]
    async fn directories_and_missing_paths_are_not_static() {
        let mut store = ProbeStore::default();
        store.dirs.insert(PathBuf::from("/var/www/html/wp-content"));
        assert!(!is_static_file_path(&store, Path::new(DOCROOT), "/wp-content").await);
        assert!(!is_static_file_path(&store, Path::new(DOCROOT), "/missing.css").await);
    }

    #[tokio::test]
    async fn php_scripts_are_not_static_even_when_present() {
        let mut store = ProbeStore::default();
        store.files.insert(PathBuf::from("/var/www/html/index.php"));
        assert!(!is_static_file_path(&store, Path::new(DOCROOT), "/index.php").await);
    }

    #[tokio::test]
    async fn probe_failure_fails_safe() {
        let mut store = ProbeStore::default();
        store.broken.insert(PathBuf::from("/var/www/html/flaky.css"));
        assert!(!is_static_file_path(&store, Path::new(DOCROOT), "/flaky.css").await);
    }
}
