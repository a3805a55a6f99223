//! Run the site.

use crate::error::{CliError, CliResult};
use colored::Colorize;
use raidbot::{Application, Site, SiteConfig};
use std::path::Path;
use std::sync::Arc;

/// Overrides given on the command line; they win over every config layer.
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub production: bool,
}

pub async fn execute(config_file: Option<&Path>, overrides: ServeOverrides) -> CliResult<()> {
    let mut config = SiteConfig::load(config_file)?;
    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    config.production |= overrides.production;

    let addr = config
        .socket_addr()
        .map_err(|e| CliError::InvalidArgument(format!("{}:{}: {}", config.host, config.port, e)))?;

    println!(
        "  {} Serving on {} ({})",
        "→".cyan(),
        format!("http://{}", addr).cyan(),
        if config.production { "production" } else { "development" }
    );

    let site = Arc::new(Site::from_config(config)?);
    let app = Application::new(site.router());

    tokio::select! {
        result = app.listen(addr) => result?,
        _ = tokio::signal::ctrl_c() => {
            raidbot_log::info!("Shutting down");
        }
    }
    Ok(())
}
