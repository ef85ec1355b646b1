//! Scripted site installation and admin login.
//!
//! Hard-coded development credentials; this sequence must only ever run
//! against the ephemeral local instance pressbox itself just mounted.

use crate::errors::PressboxResult;
use crate::php::{PhpRequest, RequestRunner};
use crate::runtime::constants::install;

/// POST the install form. The response is not validated: WordPress
/// redirects on success and re-renders the form on failure, and neither
/// case is actionable here.
pub async fn register_admin_user<R: RequestRunner + ?Sized>(php: &R) -> PressboxResult<()> {
    php.request(PhpRequest::post(
        "/wp-admin/install.php?step=2",
        &[
            ("language", install::LOCALE),
            ("prefix", install::TABLE_PREFIX),
            ("weblog_title", install::SITE_TITLE),
            ("user_name", install::ADMIN_USER),
            ("admin_password", install::ADMIN_PASSWORD),
            ("admin_password2", install::ADMIN_PASSWORD),
            ("Submit", "Install WordPress"),
            ("pw_weak", "1"),
            ("admin_email", install::ADMIN_EMAIL),
        ],
    ))
    .await?;
    Ok(())
}

/// Prime session state with a GET, then POST the credentials with a
/// persistent login.
pub async fn auto_login<R: RequestRunner + ?Sized>(php: &R) -> PressboxResult<()> {
    php.request(PhpRequest::get("/wp-login.php")).await?;

    php.request(PhpRequest::post(
        "/wp-login.php",
        &[
            ("log", install::ADMIN_USER),
            ("pwd", install::ADMIN_PASSWORD),
            ("rememberme", "forever"),
        ],
    ))
    .await?;
    Ok(())
}
