//! Constants for the pressbox runtime.
//!
//! Centralized location for hardcoded values, paths, seed files, and the
//! scripted install payload.

pub mod envs {
    pub const PRESSBOX_HOME: &str = "PRESSBOX_HOME";
}

/// Directory structure constants under the pressbox home.
pub mod dirs {
    /// Base directory name for pressbox data
    pub const PRESSBOX_DIR: &str = ".pressbox";

    /// Subdirectory holding one extracted tree per WordPress release
    pub const WORDPRESS_VERSIONS_DIR: &str = "wordpress-versions";

    /// Subdirectory holding per-project wp-content caches
    pub const WP_CONTENT_DIR: &str = "wp-content";
}

/// Defaults applied when the caller leaves an option unset.
pub mod defaults {
    /// Path the embedded web server treats as the site's public root.
    pub const DOCUMENT_ROOT: &str = "/var/www/html";

    /// WordPress release provisioned when none is requested.
    pub const WORDPRESS_VERSION: &str = "6.6";

    /// Base URL used when the caller does not supply one.
    pub const ABSOLUTE_URL: &str = "http://127.0.0.1:8881";
}

/// The bundled SQLite database driver.
pub mod sqlite {
    /// Plugin folder name, also used as the cache directory name.
    pub const PLUGIN_NAME: &str = "sqlite-database-integration";

    /// Template shipped inside the driver that becomes wp-content/db.php.
    pub const DB_COPY_FILE: &str = "db.copy";

    /// Tokens substituted when materializing db.php from the template.
    pub const TOKEN_IMPLEMENTATION_PATH: &str = "{SQLITE_IMPLEMENTATION_FOLDER_PATH}";
    pub const TOKEN_PLUGIN_NAME: &str = "{SQLITE_PLUGIN}";

    /// Where the gzip-compressed tar archive of the driver is fetched from.
    pub const DOWNLOAD_URL: &str =
        "https://codeload.github.com/WordPress/sqlite-database-integration/tar.gz/refs/heads/main";
}

/// Scripted install and login payload.
///
/// Development-only credentials for ephemeral local instances. This
/// payload must never be sent to anything but the embedded site pressbox
/// itself just mounted.
pub mod install {
    pub const LOCALE: &str = "en";
    pub const TABLE_PREFIX: &str = "wp_";
    pub const SITE_TITLE: &str = "My WordPress Website";
    pub const ADMIN_USER: &str = "admin";
    pub const ADMIN_PASSWORD: &str = "password";
    pub const ADMIN_EMAIL: &str = "admin@localhost.com";
}

/// Seed files written into the execution environment.
pub mod seeds {
    /// Placeholder entry file written before WordPress is mounted.
    pub const PLACEHOLDER_INDEX: &str = "<?php echo 'Hello from pressbox!';";

    /// Must-use plugin whitelisting WordPress.org hosts for redirects.
    ///
    /// Host-name resolution inside the execution sandbox can yield
    /// non-routable addresses for wordpress.org, which trips the redirect
    /// allow-list check during plugin and theme browsing.
    pub const ALLOW_WP_ORG_MU_PLUGIN: &str = r#"<?php
add_filter( 'allowed_redirect_hosts', function ( $deprecated = '' ) {
	return array(
		'wordpress.org',
		'api.wordpress.org',
		'downloads.wordpress.org',
	);
} );
"#;
}
