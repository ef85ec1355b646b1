//! Pressbox - local WordPress development environments
//!
//! Point pressbox at a project directory and it provisions a matching
//! WordPress site inside a PHP execution environment: the project is
//! classified by its structure (core checkout, wp-content tree, single
//! plugin, single theme, or plain static root), the requested WordPress
//! release is fetched once and cached, the project is mounted into the
//! right location of the served document root, a bundled SQLite driver
//! replaces MySQL, and the site is installed and logged in automatically.
//!
//! The PHP execution engine itself is a collaborator behind the capability
//! traits in [`php`]; any engine that can mount directories, read and write
//! files, and dispatch scripted HTTP requests can host a site.

pub mod assets;
pub mod errors;
pub mod php;
pub mod project;
pub mod releases;
pub mod runtime;
pub mod site;

pub(crate) mod util;

pub use errors::{PressboxError, PressboxResult};
pub use project::Mode;
pub use runtime::layout::FilesystemLayout;
pub use runtime::options::{PhpVersion, PressBoxOptions};
pub use site::PressBox;
