use crate::app::status::render_status;
use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use qcdt_monitor::config::Config;
use qcdt_monitor::endpoint::{HttpPriceEndpoint, PriceEndpoint};
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run => {
            info!(
                "Starting qcdt-monitor v{} ({})",
                env!("CARGO_PKG_VERSION"),
                config.config_path.display()
            );
            qcdt_monitor::daemon::run(&config).await
        }

        Commands::Status => {
            println!("{}", render_status(&config));
            println!();
            probe_endpoint(&config).await
        }
    }
}

async fn probe_endpoint(config: &Config) -> Result<()> {
    let endpoint = HttpPriceEndpoint::new(config.endpoint.url.clone(), config.endpoint.timeout_secs);
    let payload = endpoint
        .fetch()
        .await
        .with_context(|| format!("Price fetch from {} failed", endpoint.url()))?;

    println!("Latest price ({}):", payload.update_marker());
    println!("{}", serde_json::to_string_pretty(payload.raw())?);
    Ok(())
}
