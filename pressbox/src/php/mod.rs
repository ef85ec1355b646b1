//! Capability interfaces for the PHP execution environment.
//!
//! The execution engine (interpreter, virtual filesystem, request
//! dispatch) is a collaborator. The orchestrator only depends on the
//! narrow capabilities below, so engines and test fakes can be swapped
//! behind the same seams.

mod static_files;

pub use static_files::{is_static_file_path, seems_like_php_file};

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::PressboxResult;
use crate::runtime::options::PhpVersion;

/// HTTP method for a scripted request against the embedded site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

/// A scripted request against the embedded site.
#[derive(Clone, Debug)]
pub struct PhpRequest {
    /// Site-relative URL, e.g. `/wp-login.php`.
    pub url: String,
    pub method: RequestMethod,
    /// Form fields sent as the request body on POST.
    pub form_data: Vec<(String, String)>,
}

impl PhpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Get,
            form_data: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>, form_data: &[(&str, &str)]) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Post,
            form_data: form_data
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

/// Response from the embedded site.
#[derive(Clone, Debug, Default)]
pub struct PhpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Binds host directories into the environment's virtual filesystem.
#[async_trait]
pub trait Mounter {
    /// Make `source`'s contents visible at `target` without copying.
    /// Later mounts shadow subpaths of earlier ones.
    async fn mount(&self, source: &Path, target: &Path) -> PressboxResult<()>;
}

/// File operations against the environment's virtual filesystem.
#[async_trait]
pub trait FileStore {
    async fn write_file(&self, path: &Path, contents: &str) -> PressboxResult<()>;
    async fn read_file_to_string(&self, path: &Path) -> PressboxResult<String>;
    async fn file_exists(&self, path: &Path) -> PressboxResult<bool>;
    async fn is_dir(&self, path: &Path) -> PressboxResult<bool>;
    async fn mkdir_tree(&self, path: &Path) -> PressboxResult<()>;
}

/// Executes scripted HTTP requests against the embedded site.
#[async_trait]
pub trait RequestRunner {
    async fn request(&self, request: PhpRequest) -> PressboxResult<PhpResponse>;
}

/// Full execution-environment handle the orchestrator drives.
#[async_trait]
pub trait PhpRuntime: Mounter + FileStore + RequestRunner + Send + Sync {
    /// Change the environment's working directory.
    async fn chdir(&self, path: &Path) -> PressboxResult<()>;
}

/// Request-handler configuration handed to the engine at load time.
///
/// Engines decide whether to serve a path as a static file with
/// [`is_static_file_path`] against this document root.
#[derive(Clone, Debug)]
pub struct RequestHandlerConfig {
    pub document_root: PathBuf,
    pub absolute_url: String,
}

/// Loads a PHP execution environment for a given interpreter version.
#[async_trait]
pub trait PhpFactory {
    type Runtime: PhpRuntime;

    async fn load(
        &self,
        version: PhpVersion,
        handler: RequestHandlerConfig,
    ) -> PressboxResult<Self::Runtime>;
}
