use anyhow::Result;
use clap::Parser;

use dolphin_daemon::cli::SendCli;
use dolphin_daemon::logging;
use dolphin_daemon::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = SendCli::parse();
    let config = cli.load_config().await?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general, cli.debug)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dolphin-send starting");

    let orchestrator = Orchestrator::build_from_config(config).inspect_err(|e| {
        tracing::error!(error = %e, "failed to initialize");
    })?;

    orchestrator.run().await.inspect_err(|e| {
        tracing::error!(error = %e, "dolphin-send exiting with error");
    })
}
