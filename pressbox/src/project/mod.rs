//! Project directory classification.
//!
//! A project directory is classified by structural markers into the mode
//! that decides how it gets mounted into the served site. Detection is an
//! explicit ordered list of (predicate, mode) pairs so the priority among
//! overlapping signals stays auditable: a core checkout also contains a
//! wp-content tree, and a wp-content tree can contain files with plugin
//! headers. The first match wins; a directory matching nothing is served
//! verbatim.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PressboxError;

/// Operating mode for a pressbox site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// The project is a full WordPress core checkout.
    Core,
    /// The project is a single plugin.
    Plugin,
    /// The project is a single theme.
    Theme,
    /// The project directory is served verbatim; no WordPress involved.
    Index,
    /// The project is a wp-content tree.
    WpContent,
    /// Request-time only: infer the mode from the project directory.
    /// Resolved options never carry this value.
    #[default]
    Auto,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Core => "core",
            Mode::Plugin => "plugin",
            Mode::Theme => "theme",
            Mode::Index => "index",
            Mode::WpContent => "wp-content",
            Mode::Auto => "auto",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PressboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(Mode::Core),
            "plugin" => Ok(Mode::Plugin),
            "theme" => Ok(Mode::Theme),
            "index" => Ok(Mode::Index),
            "wp-content" => Ok(Mode::WpContent),
            "auto" => Ok(Mode::Auto),
            other => Err(PressboxError::Config(format!(
                "Unknown mode: {other}. Valid modes: core, plugin, theme, index, wp-content, auto"
            ))),
        }
    }
}

/// Detection order encodes priority among overlapping markers; the first
/// matching predicate decides the mode.
const DETECTORS: &[(fn(&Path) -> bool, Mode)] = &[
    (is_core_directory, Mode::Core),
    (is_wp_content_directory, Mode::WpContent),
    (is_plugin_directory, Mode::Plugin),
    (is_theme_directory, Mode::Theme),
];

/// Classify a project directory into a concrete mode.
///
/// Pure structural inspection, no side effects. Never returns
/// [`Mode::Auto`]; a directory matching no detector falls through to
/// [`Mode::Index`].
pub fn infer_mode(project_path: &Path) -> Mode {
    for (detect, mode) in DETECTORS {
        if detect(project_path) {
            return *mode;
        }
    }
    Mode::Index
}

/// A full core checkout: `wp-includes/` and `wp-admin/` plus `wp-load.php`.
pub fn is_core_directory(path: &Path) -> bool {
    path.join("wp-includes").is_dir()
        && path.join("wp-admin").is_dir()
        && path.join("wp-load.php").is_file()
}

/// A wp-content tree: `plugins/` and `themes/` subdirectories.
pub fn is_wp_content_directory(path: &Path) -> bool {
    path.join("plugins").is_dir() && path.join("themes").is_dir()
}

/// A single plugin: some top-level PHP file carrying a `Plugin Name:`
/// header.
pub fn is_plugin_directory(path: &Path) -> bool {
    let Ok(entries) = fs::read_dir(path) else {
        return false;
    };
    for entry in entries.flatten() {
        let file = entry.path();
        if file.extension().is_some_and(|ext| ext == "php")
            && let Ok(contents) = fs::read_to_string(&file)
            && contents.contains("Plugin Name:")
        {
            return true;
        }
    }
    false
}

/// A single theme: a `style.css` carrying a `Theme Name:` header.
pub fn is_theme_directory(path: &Path) -> bool {
    match fs::read_to_string(path.join("style.css")) {
        Ok(contents) => contents.contains("Theme Name:"),
        Err(_) => false,
    }
}
