use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use pressbox::assets::HttpAssetProvisioner;
use pressbox::runtime::constants::defaults;
use pressbox::{FilesystemLayout, Mode, PhpVersion, PressBox, PressBoxOptions};

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Project directory to serve
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// PHP version to load
    #[arg(long = "php", default_value_t = PhpVersion::default())]
    pub php_version: PhpVersion,

    /// WordPress release to provision (stable version, "beta", or "nightly")
    #[arg(long = "wp", default_value = defaults::WORDPRESS_VERSION)]
    pub wordpress_version: String,

    /// Port the site is served on
    #[arg(long, default_value_t = 8881)]
    pub port: u16,

    /// Operating mode; inferred from the project directory by default
    #[arg(long, default_value_t = Mode::Auto)]
    pub mode: Mode,
}

pub async fn execute(args: StartArgs) -> anyhow::Result<()> {
    let project_path = args.path.canonicalize().with_context(|| {
        format!("project directory {} is not accessible", args.path.display())
    })?;

    let layout = FilesystemLayout::from_env();
    layout.prepare()?;

    let absolute_url = format!("http://127.0.0.1:{}", args.port);
    // The host adapter serves straight off the host filesystem, so the
    // document root is a per-process scratch directory rather than a
    // virtual path.
    let document_root = std::env::temp_dir().join(format!("pressbox-{}", std::process::id()));

    let options = PressBoxOptions {
        php_version: args.php_version,
        document_root,
        absolute_url: absolute_url.clone(),
        mode: args.mode,
        project_path,
        wordpress_version: args.wordpress_version,
        ..Default::default()
    };

    let factory = crate::php_host::PhpHostFactory::new()?;
    let site = PressBox::create(options, layout.clone(), &factory).await?;
    let assets = HttpAssetProvisioner::new(layout);
    site.start(&assets).await?;

    println!(
        "Serving {} at {absolute_url} (mode: {})",
        site.options().project_path.display(),
        site.options().mode
    );
    println!("Press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    Ok(())
}
