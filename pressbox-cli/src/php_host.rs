//! PHP execution environment backed by the system `php` binary.
//!
//! The document root lives on the host filesystem: "mounting" binds a
//! directory into it with symlinks, file operations go straight to disk,
//! and scripted requests travel over HTTP to a `php -S` development
//! server that is spawned lazily on first request.

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use pressbox::errors::{PressboxError, PressboxResult};
use pressbox::php::{
    FileStore, Mounter, PhpFactory, PhpRequest, PhpResponse, PhpRuntime, RequestHandlerConfig,
    RequestMethod, RequestRunner,
};
use pressbox::runtime::options::PhpVersion;

/// Locates the system interpreter and hands out [`PhpHost`] instances.
pub struct PhpHostFactory {
    binary: PathBuf,
}

impl PhpHostFactory {
    pub fn new() -> PressboxResult<Self> {
        let binary = which::which("php")
            .map_err(|e| PressboxError::Runtime(format!("php binary not found on PATH: {e}")))?;
        Ok(Self { binary })
    }
}

#[async_trait]
impl PhpFactory for PhpHostFactory {
    type Runtime = PhpHost;

    async fn load(
        &self,
        version: PhpVersion,
        handler: RequestHandlerConfig,
    ) -> PressboxResult<PhpHost> {
        // The system interpreter is whatever is installed; the requested
        // version is advisory here.
        info!(requested = %version, binary = %self.binary.display(), "using system php interpreter");

        let listen = handler
            .absolute_url
            .strip_prefix("http://")
            .unwrap_or(&handler.absolute_url)
            .trim_end_matches('/')
            .to_string();

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| PressboxError::Runtime(format!("failed to build http client: {e}")))?;

        Ok(PhpHost {
            binary: self.binary.clone(),
            document_root: handler.document_root,
            base_url: handler.absolute_url,
            listen,
            client,
            cwd: Mutex::new(None),
            server: OnceCell::new(),
        })
    }
}

/// One `php -S` development server rooted at the document root.
pub struct PhpHost {
    binary: PathBuf,
    document_root: PathBuf,
    base_url: String,
    listen: String,
    client: reqwest::Client,
    cwd: Mutex<Option<PathBuf>>,
    server: OnceCell<Child>,
}

impl PhpHost {
    /// Spawn the server on first use and wait until it accepts
    /// connections. The child is killed when this host drops.
    async fn ensure_server(&self) -> PressboxResult<()> {
        self.server
            .get_or_try_init(|| async {
                debug!(listen = %self.listen, "spawning php development server");
                let cwd = self
                    .cwd
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| self.document_root.clone());
                let child = Command::new(&self.binary)
                    .arg("-S")
                    .arg(&self.listen)
                    .arg("-t")
                    .arg(&self.document_root)
                    .current_dir(cwd)
                    .kill_on_drop(true)
                    .spawn()
                    .map_err(|e| {
                        PressboxError::Runtime(format!("failed to spawn php server: {e}"))
                    })?;

                for _ in 0..50 {
                    if tokio::net::TcpStream::connect(&self.listen).await.is_ok() {
                        return Ok(child);
                    }
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                Err(PressboxError::Runtime(format!(
                    "php server did not start listening on {}",
                    self.listen
                )))
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Mounter for PhpHost {
    async fn mount(&self, source: &Path, target: &Path) -> PressboxResult<()> {
        debug!(source = %source.display(), target = %target.display(), "mounting");
        match fs::symlink_metadata(target) {
            Ok(meta) if meta.file_type().is_symlink() || meta.is_file() => {
                fs::remove_file(target).map_err(|e| storage(target, e))?;
                symlink(source, target).map_err(|e| storage(target, e))?;
            }
            Ok(_) => {
                // Existing directory. Empty ones are replaced outright;
                // populated ones (the document root) get one link per
                // entry so files written next to the links stay visible.
                match fs::remove_dir(target) {
                    Ok(()) => symlink(source, target).map_err(|e| storage(target, e))?,
                    Err(_) => link_entries(source, target)?,
                }
            }
            Err(_) => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| storage(parent, e))?;
                }
                symlink(source, target).map_err(|e| storage(target, e))?;
            }
        }
        Ok(())
    }
}

fn link_entries(source: &Path, target: &Path) -> PressboxResult<()> {
    for entry in fs::read_dir(source).map_err(|e| storage(source, e))? {
        let entry = entry.map_err(|e| storage(source, e))?;
        let dest = target.join(entry.file_name());
        match fs::symlink_metadata(&dest) {
            Ok(meta) if meta.is_dir() && !meta.file_type().is_symlink() => {
                fs::remove_dir_all(&dest).map_err(|e| storage(&dest, e))?;
            }
            Ok(_) => fs::remove_file(&dest).map_err(|e| storage(&dest, e))?,
            Err(_) => {}
        }
        symlink(entry.path(), &dest).map_err(|e| storage(&dest, e))?;
    }
    Ok(())
}

fn storage(path: &Path, err: std::io::Error) -> PressboxError {
    PressboxError::Storage(format!("{}: {err}", path.display()))
}

#[async_trait]
impl FileStore for PhpHost {
    async fn write_file(&self, path: &Path, contents: &str) -> PressboxResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage(parent, e))?;
        }
        fs::write(path, contents).map_err(|e| storage(path, e))
    }

    async fn read_file_to_string(&self, path: &Path) -> PressboxResult<String> {
        fs::read_to_string(path).map_err(|e| storage(path, e))
    }

    async fn file_exists(&self, path: &Path) -> PressboxResult<bool> {
        Ok(path.exists())
    }

    async fn is_dir(&self, path: &Path) -> PressboxResult<bool> {
        Ok(path.is_dir())
    }

    async fn mkdir_tree(&self, path: &Path) -> PressboxResult<()> {
        fs::create_dir_all(path).map_err(|e| storage(path, e))
    }
}

#[async_trait]
impl RequestRunner for PhpHost {
    async fn request(&self, request: PhpRequest) -> PressboxResult<PhpResponse> {
        self.ensure_server().await?;

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request.url);
        debug!(%url, "dispatching scripted request");
        let response = match request.method {
            RequestMethod::Get => self.client.get(&url).send().await,
            RequestMethod::Post => self.client.post(&url).form(&request.form_data).send().await,
        }
        .map_err(|e| PressboxError::Runtime(format!("request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PressboxError::Runtime(format!("failed to read response body: {e}")))?
            .to_vec();
        Ok(PhpResponse { status, body })
    }
}

#[async_trait]
impl PhpRuntime for PhpHost {
    async fn chdir(&self, path: &Path) -> PressboxResult<()> {
        *self.cwd.lock().unwrap() = Some(path.to_path_buf());
        Ok(())
    }
}
