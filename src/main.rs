use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use kladr_lookup::cli::{Cli, Commands};
use kladr_lookup::config::StaticConfig;
use kladr_lookup::runtime::modes;
use kladr_lookup::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = StaticConfig::load(Some(cli.config.as_str()));

    match cli.command() {
        Commands::Serve => {
            let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;
            info!(
                "kladr-lookup {} ({}) starting",
                env!("CARGO_PKG_VERSION"),
                config.app.branch
            );
            modes::run_server(Arc::new(config)).await
        }
        command => {
            if let Err(e) = modes::run_command(&command, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
