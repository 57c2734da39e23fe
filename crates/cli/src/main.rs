//! # Roster CLI
//!
//! Command-line interface for the Roster user service.
//!
//! ## Usage
//!
//! ```bash
//! roster serve              # Apply pending migrations and start the API server
//! roster migrate            # Apply pending migrations
//! roster migrate --status   # List applied migrations
//! roster migrate --rollback # Revert the most recent migration
//! roster --help             # Show help
//! ```

mod commands;
mod config;
mod server;

use clap::{CommandFactory as _, Parser};
use error::Result;

use crate::{
    commands::{completions::completions, migrate::migrate, validate::validate, Commands},
    config::AppConfig,
};

/// Roster - users service over MongoDB and Redis
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info", global = true)]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "ROSTER_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: String,

    /// Also write JSON logs to this file
    #[arg(long, env = "ROSTER_LOG_FILE", global = true)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal outside development
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        return completions(args.shell, &mut Cli::command());
    }

    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Roster CLI starting...");

    match cli.command {
        Commands::Serve(args) => crate::server::serve(&AppConfig::from_env()?, &args).await?,
        Commands::Migrate(args) => migrate(&AppConfig::from_env()?, args).await?,
        Commands::Validate => validate().await?,
        Commands::Completions(_) => {},
    }

    logging::info!(target: "app", "Roster CLI completed successfully");
    Ok(())
}
