//! profile-log CLI
//!
//! ```text
//! profile-log --config log.toml check-config
//! profile-log --config log.toml send --level error "db failed" --field user_id=42
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use profile_log::config::{load_config, LogConfig};
use profile_log::field::{Field, LoggedError};
use profile_log::logger::{build_logger, Level};
use profile_log::observability::logging::init_tracing;

#[derive(Parser)]
#[command(name = "profile-log")]
#[command(about = "Validate logging config and emit test entries", long_about = None)]
struct Cli {
    /// Path to the TOML config; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the config, then print the effective values
    CheckConfig,
    /// Send one entry through the configured pipeline
    Send {
        /// Entry level (debug, info, warn, error, dpanic, panic)
        #[arg(short, long, default_value = "error")]
        level: Level,

        message: String,

        /// Extra string fields as key=value; `tag.` keys become tags
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LogConfig::default(),
    };

    init_tracing(config.log_level, config.mode)?;

    match cli.command {
        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Send {
            level,
            message,
            fields,
        } => {
            let logger = build_logger(&config)?;
            let mut call_site: Vec<Field> = fields
                .into_iter()
                .map(|(k, v)| Field::string(k, v))
                .collect();
            if level >= Level::Error {
                call_site.push(Field::logged(LoggedError::from_message(message.clone())));
            }

            logger.log(level, &message, call_site);
            logger.sync()?;
            tracing::info!(level = %level, "Entry sent");
        }
    }

    Ok(())
}
