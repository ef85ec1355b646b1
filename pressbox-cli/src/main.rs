mod cli;
mod commands;
mod php_host;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::init_tracing();
    let args = cli::Cli::parse();
    cli::run(args).await
}
