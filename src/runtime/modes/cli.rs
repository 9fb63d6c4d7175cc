//! CLI mode
//!
//! One-shot sub-commands. Output goes to stdout, errors are returned to
//! `main` which prints them.

use colored::Colorize;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::errors::Result;
use crate::storage::{IndexKind, StorageFactory};
use crate::utils::{decode_range, encode_ip};

/// Run a non-server sub-command
pub async fn run_command(command: &Commands, config: &StaticConfig) -> Result<()> {
    match command {
        Commands::Serve => Ok(()),
        Commands::InitIndex => init_indices(config).await,
        Commands::EncodeIp { ip } => {
            println!("{}", encode_ip(ip.trim())?);
            Ok(())
        }
        Commands::DecodeRange { range } => {
            let (start, end) = decode_range(range)?;
            println!("{} {}", start, end);
            Ok(())
        }
        Commands::Config => {
            println!("{}", StaticConfig::generate_sample_config());
            Ok(())
        }
    }
}

async fn init_indices(config: &StaticConfig) -> Result<()> {
    let store = StorageFactory::create(&config.index);
    for index in [IndexKind::Kladr, IndexKind::GeoIp] {
        if store.ensure_index(index).await? {
            println!("{} index {} created", "✓".green().bold(), index);
        } else {
            println!("{} index {} already exists", "•".cyan(), index);
        }
    }
    Ok(())
}
