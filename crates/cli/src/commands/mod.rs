//! # CLI Commands
//!
//! Implementation of CLI commands for the Roster application.

pub mod completions;
pub mod migrate;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the Roster CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pending migrations and start the API server
    Serve(ServeArgs),

    /// Apply, roll back or inspect migrations
    Migrate(MigrateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Check configuration and backing services
    Validate,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "ROSTER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "ROSTER_PORT", default_value = "8080")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long, conflicts_with_all = ["rollback", "status"])]
    pub dry_run: bool,

    /// Roll back the most recently applied migration
    #[arg(long, conflicts_with = "status")]
    pub rollback: bool,

    /// Show applied migrations in order
    #[arg(long)]
    pub status: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
