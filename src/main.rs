//! SMAE dashboard CLI entry point.

use clap::Parser;

use smae_dashboard::cli::{execute, handle_error, Cli, DashboardContext};
use smae_dashboard::infrastructure::config::ConfigLoader;
use smae_dashboard::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        std::process::exit(handle_error(&err, json));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    // Held until exit so buffered file logs are flushed
    let _logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    let ctx = DashboardContext::from_config(config, cli.json)?;
    execute(cli.command, &ctx).await
}
