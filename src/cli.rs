//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// kladr-lookup - address and GeoIP lookup in front of a search index
#[derive(Parser, Debug)]
#[command(name = "kladr-lookup")]
#[command(version)]
#[command(about = "KLADR address and GeoIP lookup service", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create the KLADR and GeoIP indices when they do not exist
    InitIndex,

    /// Print the sortable integer for a dotted-quad address
    EncodeIp {
        /// e.g. 192.168.0.1
        ip: String,
    },

    /// Print the encoded endpoints of an address range
    DecodeRange {
        /// e.g. "1.2.3.0 - 1.2.3.255"
        range: String,
    },

    /// Print a sample configuration file
    Config,
}

impl Cli {
    /// Sub-command to run; none means serve
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["kladr-lookup"]);
        assert_eq!(cli.command(), Commands::Serve);
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["kladr-lookup", "encode-ip", "1.2.3.4", "-c", "/etc/kladr.toml"]);
        assert_eq!(cli.config, "/etc/kladr.toml");
        assert_eq!(
            cli.command(),
            Commands::EncodeIp {
                ip: "1.2.3.4".to_string()
            }
        );
    }

    #[test]
    fn test_decode_range_takes_one_argument() {
        let cli = Cli::parse_from(["kladr-lookup", "decode-range", "1.2.3.0 - 1.2.3.255"]);
        assert_eq!(
            cli.command(),
            Commands::DecodeRange {
                range: "1.2.3.0 - 1.2.3.255".to_string()
            }
        );
    }
}
