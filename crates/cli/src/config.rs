//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Command;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Where the cart and the order log are kept.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the cart and order log JSON files
    #[arg(long, env = "MANDANDA_DATA_DIR", default_value = ".mandanda", global = true)]
    pub data_dir: PathBuf,
}

/// Mandanda shop from the terminal
#[derive(Debug, Parser)]
#[command(name = "mandanda", about = "Mandanda merchandise shop", long_about = None)]
pub(crate) struct Config {
    /// Persistence settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
