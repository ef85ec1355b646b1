//! Site orchestration: mount, install, log in, serve.
//!
//! [`PressBox`] sequences the provisioning steps strictly one after the
//! other; every operation is awaited to completion before the next begins
//! and any failure aborts the whole sequence unmodified.

mod installer;
mod wp_config;

pub use wp_config::PhpLiteral;

use std::path::PathBuf;

use tracing::info;

use crate::assets::AssetProvisioner;
use crate::errors::PressboxResult;
use crate::php::{PhpFactory, PhpRuntime, RequestHandlerConfig};
use crate::project::Mode;
use crate::runtime::constants::{seeds, sqlite};
use crate::runtime::layout::FilesystemLayout;
use crate::runtime::options::PressBoxOptions;
use crate::util;

/// A provisioned local WordPress site.
///
/// Created by [`PressBox::create`], which resolves options and loads the
/// PHP execution environment; [`PressBox::start`] then runs the full
/// provisioning sequence.
///
/// All operations are strictly sequential within one instance, so no two
/// steps ever race over the same mount target. Instances are not
/// coordinated with each other: two instances pointed at the same project
/// path share a content cache, and running them concurrently is undefined
/// behavior the caller must avoid.
#[derive(Debug)]
pub struct PressBox<P: PhpRuntime> {
    options: PressBoxOptions,
    layout: FilesystemLayout,
    php: P,
}

impl<P: PhpRuntime> PressBox<P> {
    /// Resolve options, load the PHP environment, and seed the document
    /// root with a placeholder entry file.
    ///
    /// Configuration errors (unknown release, inaccessible project path)
    /// surface here, before the factory is asked to do anything.
    pub async fn create<F>(
        options: PressBoxOptions,
        layout: FilesystemLayout,
        factory: &F,
    ) -> PressboxResult<Self>
    where
        F: PhpFactory<Runtime = P>,
    {
        let options = options.resolve(&layout)?;

        let php = factory
            .load(
                options.php_version,
                RequestHandlerConfig {
                    document_root: options.document_root.clone(),
                    absolute_url: options.absolute_url.clone(),
                },
            )
            .await?;

        php.mkdir_tree(&options.document_root).await?;
        php.chdir(&options.document_root).await?;
        php.write_file(
            &options.document_root.join("index.php"),
            seeds::PLACEHOLDER_INDEX,
        )
        .await?;

        Ok(Self {
            options,
            layout,
            php,
        })
    }

    /// Resolved options for this site. Never contains [`Mode::Auto`].
    pub fn options(&self) -> &PressBoxOptions {
        &self.options
    }

    /// The PHP execution environment backing this site.
    pub fn php(&self) -> &P {
        &self.php
    }

    /// Run the full provisioning sequence: download assets, build the
    /// mount tree, install the site, and log the admin user in.
    pub async fn start<A: AssetProvisioner + ?Sized>(&self, assets: &A) -> PressboxResult<()> {
        info!(
            project = %self.options.project_path.display(),
            mode = %self.options.mode,
            php = %self.options.php_version,
            wp = %self.options.wordpress_version,
            "starting site"
        );

        if self.options.mode == Mode::Index {
            self.mount().await?;
            return Ok(());
        }

        assets.ensure_wordpress(&self.options.wordpress_version).await?;
        assets.ensure_sqlite_driver().await?;
        self.mount().await?;
        installer::register_admin_user(&self.php).await?;
        installer::auto_login(&self.php).await?;
        Ok(())
    }

    /// Build the mount tree for the resolved mode and seed the WordPress
    /// configuration.
    ///
    /// Mount order matters: the WordPress root goes first and later mounts
    /// shadow subpaths of it. A failing step propagates immediately and
    /// leaves earlier mounts in place; there is no rollback.
    pub async fn mount(&self) -> PressboxResult<()> {
        let mode = self.options.mode;
        let document_root = &self.options.document_root;
        let project_path = &self.options.project_path;

        if mode == Mode::Index {
            self.php.mount(project_path, document_root).await?;
            return Ok(());
        }

        self.mount_wordpress().await?;

        let content_cache = self.content_cache_dir();
        util::ensure_dir(&content_cache)?;

        // The project is the wp-content tree; mount it as is.
        if mode == Mode::WpContent {
            self.php
                .mount(project_path, &document_root.join("wp-content"))
                .await?;
        }

        // Seed the per-project content cache from the release's pristine
        // wp-content tree and mount it, giving the project an isolated,
        // mutable content directory.
        if matches!(mode, Mode::Core | Mode::Plugin | Mode::Theme) {
            let release_content = self
                .layout
                .wordpress_version_dir(&self.options.wordpress_version)
                .join("wp-content");
            util::copy_dir_recursive(&release_content, &content_cache)?;
            self.php
                .mount(&content_cache, &document_root.join("wp-content"))
                .await?;
        }

        // Expose the single plugin or theme inside the otherwise stock
        // install, named after the project directory.
        if matches!(mode, Mode::Plugin | Mode::Theme) {
            let folder_name = util::dir_basename(project_path);
            let subtree = if mode == Mode::Plugin {
                "plugins"
            } else {
                "themes"
            };
            util::ensure_dir(&content_cache.join(subtree).join(&folder_name))?;
            self.php
                .mount(
                    project_path,
                    &document_root
                        .join("wp-content")
                        .join(subtree)
                        .join(folder_name),
                )
                .await?;
        }

        self.mount_sqlite().await?;
        Ok(())
    }

    /// Mount the WordPress source root onto the document root and seed its
    /// configuration: wp-config.php from the sample, site-URL constants,
    /// and (for non-core modes) the auto-update switch plus the
    /// redirect-allow-list must-use plugin.
    async fn mount_wordpress(&self) -> PressboxResult<()> {
        let document_root = &self.options.document_root;

        let root = match self.options.mode {
            Mode::Core => self.options.project_path.clone(),
            _ => self
                .layout
                .wordpress_version_dir(&self.options.wordpress_version),
        };
        self.php.mount(&root, document_root).await?;

        wp_config::seed_from_sample(&self.php, document_root).await?;
        wp_config::define_constants(
            &self.php,
            document_root,
            &[
                ("WP_HOME", PhpLiteral::str(&self.options.absolute_url)),
                ("WP_SITEURL", PhpLiteral::str(&self.options.absolute_url)),
            ],
        )
        .await?;

        if self.options.mode != Mode::Core {
            wp_config::define_constants(
                &self.php,
                document_root,
                &[("WP_AUTO_UPDATE_CORE", PhpLiteral::Bool(false))],
            )
            .await?;

            let mu_plugins = document_root.join("wp-content").join("mu-plugins");
            self.php.mkdir_tree(&mu_plugins).await?;
            self.php
                .write_file(
                    &mu_plugins.join("0-allow-wp-org.php"),
                    seeds::ALLOW_WP_ORG_MU_PLUGIN,
                )
                .await?;
        }

        Ok(())
    }

    /// Mount the SQLite driver as a plugin and materialize the db.php
    /// drop-in from its template.
    async fn mount_sqlite(&self) -> PressboxResult<()> {
        let document_root = &self.options.document_root;
        let plugin_target = document_root
            .join("wp-content")
            .join("plugins")
            .join(sqlite::PLUGIN_NAME);

        self.php.mkdir_tree(&plugin_target).await?;
        self.php
            .mount(&self.layout.sqlite_driver_dir(), &plugin_target)
            .await?;

        let template = self
            .php
            .read_file_to_string(&plugin_target.join(sqlite::DB_COPY_FILE))
            .await?;
        let db_drop_in = template
            .replace(
                sqlite::TOKEN_IMPLEMENTATION_PATH,
                &plugin_target.to_string_lossy(),
            )
            .replace(sqlite::TOKEN_PLUGIN_NAME, sqlite::PLUGIN_NAME);

        self.php
            .write_file(&document_root.join("wp-content").join("db.php"), &db_drop_in)
            .await
    }

    fn content_cache_dir(&self) -> PathBuf {
        self.options
            .wp_content_path
            .clone()
            .unwrap_or_else(|| self.layout.project_content_dir(&self.options.project_path))
    }
}
