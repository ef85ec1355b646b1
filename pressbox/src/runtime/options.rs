//! Configuration for a pressbox site.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{PressboxError, PressboxResult};
use crate::project::{self, Mode};
use crate::releases;
use crate::runtime::constants::defaults;
use crate::runtime::layout::FilesystemLayout;

/// PHP interpreter versions the execution environment ships.
pub const SUPPORTED_PHP_VERSIONS: &[PhpVersion] = &[
    PhpVersion::Php82,
    PhpVersion::Php81,
    PhpVersion::Php80,
    PhpVersion::Php74,
    PhpVersion::Php73,
    PhpVersion::Php72,
    PhpVersion::Php71,
    PhpVersion::Php70,
    PhpVersion::Php56,
];

/// A supported PHP interpreter version.
///
/// The set is closed: an unsupported version cannot be represented, so
/// version validation happens at parse time, before any side effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhpVersion {
    #[serde(rename = "5.6")]
    Php56,
    #[serde(rename = "7.0")]
    Php70,
    #[serde(rename = "7.1")]
    Php71,
    #[serde(rename = "7.2")]
    Php72,
    #[serde(rename = "7.3")]
    Php73,
    #[serde(rename = "7.4")]
    Php74,
    #[default]
    #[serde(rename = "8.0")]
    Php80,
    #[serde(rename = "8.1")]
    Php81,
    #[serde(rename = "8.2")]
    Php82,
}

impl PhpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhpVersion::Php56 => "5.6",
            PhpVersion::Php70 => "7.0",
            PhpVersion::Php71 => "7.1",
            PhpVersion::Php72 => "7.2",
            PhpVersion::Php73 => "7.3",
            PhpVersion::Php74 => "7.4",
            PhpVersion::Php80 => "8.0",
            PhpVersion::Php81 => "8.1",
            PhpVersion::Php82 => "8.2",
        }
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhpVersion {
    type Err = PressboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_PHP_VERSIONS
            .iter()
            .find(|version| version.as_str() == s)
            .copied()
            .ok_or_else(|| {
                let supported = SUPPORTED_PHP_VERSIONS
                    .iter()
                    .map(PhpVersion::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                PressboxError::Config(format!(
                    "Unsupported PHP version: {s}. Supported versions: {supported}"
                ))
            })
    }
}

/// Configuration options for a pressbox site.
///
/// Callers construct this with overrides merged onto [`Default`] and pass
/// it to [`PressBox::create`](crate::site::PressBox::create), which
/// resolves request-time values exactly once. Resolved options never carry
/// [`Mode::Auto`] and never change afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PressBoxOptions {
    /// PHP interpreter version loaded into the execution environment.
    #[serde(default)]
    pub php_version: PhpVersion,

    /// Path the embedded web server treats as the site's public root.
    #[serde(default = "default_document_root")]
    pub document_root: PathBuf,

    /// Externally reachable base URL for the site.
    #[serde(default = "default_absolute_url")]
    pub absolute_url: String,

    /// Operating mode; `Auto` is inferred from the project directory.
    #[serde(default)]
    pub mode: Mode,

    /// Project directory; defaults to the current working directory.
    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,

    /// Per-project wp-content cache; derived from the project path when
    /// unset.
    #[serde(default)]
    pub wp_content_path: Option<PathBuf>,

    /// WordPress release identifier (stable version, "beta", or
    /// "nightly").
    #[serde(default = "default_wordpress_version")]
    pub wordpress_version: String,
}

fn default_document_root() -> PathBuf {
    PathBuf::from(defaults::DOCUMENT_ROOT)
}

fn default_absolute_url() -> String {
    defaults::ABSOLUTE_URL.to_string()
}

fn default_project_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_wordpress_version() -> String {
    defaults::WORDPRESS_VERSION.to_string()
}

impl Default for PressBoxOptions {
    fn default() -> Self {
        Self {
            php_version: PhpVersion::default(),
            document_root: default_document_root(),
            absolute_url: default_absolute_url(),
            mode: Mode::default(),
            project_path: default_project_path(),
            wp_content_path: None,
            wordpress_version: default_wordpress_version(),
        }
    }
}

impl PressBoxOptions {
    /// Validate and resolve request-time values.
    ///
    /// Checks the release identifier against the registry, canonicalizes
    /// the project path, infers `Auto` mode from the project directory,
    /// and derives the per-project wp-content cache path. Fails before any
    /// side effect occurs.
    pub fn resolve(mut self, layout: &FilesystemLayout) -> PressboxResult<Self> {
        releases::details(&self.wordpress_version)?;

        self.project_path = self.project_path.canonicalize().map_err(|e| {
            PressboxError::Config(format!(
                "project directory {} is not accessible: {e}",
                self.project_path.display()
            ))
        })?;

        if self.mode == Mode::Auto {
            self.mode = project::infer_mode(&self.project_path);
        }

        if self.wp_content_path.is_none() {
            self.wp_content_path = Some(layout.project_content_dir(&self.project_path));
        }

        Ok(self)
    }
}
