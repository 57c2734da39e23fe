//! # CLI Migration Command
//!
//! Applies, rolls back and reports migrations for the Roster CLI.

use std::{fmt::Write as _, sync::Arc};

use error::{Result, ResultExt as _};
use migration::{Migration, MigrationManager, MigrationRecord};
use store::DocumentStore;
use tracing::info;

use crate::{commands::MigrateArgs, config::AppConfig};

/// Runs the migrate command against the configured store
///
/// # Arguments
///
/// * `config` - Service configuration
/// * `args` - Migrate command arguments
pub async fn migrate(config: &AppConfig, args: MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        status = %args.status,
        "Running migrations..."
    );

    let store = store::connect(&config.store).await?;
    let report = execute(store, &args, &migration::migrations()).await.log_error()?;
    print!("{}", report);
    Ok(())
}

/// Perform the requested migration action and describe the outcome.
pub async fn execute(
    store: Arc<dyn DocumentStore>,
    args: &MigrateArgs,
    migrations: &[Box<dyn Migration>],
) -> Result<String> {
    let manager = MigrationManager::new(store);
    manager.initialize().await?;

    if args.status {
        return Ok(format_status(&manager.status().await?));
    }

    if args.dry_run {
        let pending = manager.pending(migrations).await?;
        info!(target: "migrate", pending_count = %pending.len(), "Dry run complete");

        let mut out = String::new();
        if pending.is_empty() {
            out.push_str("No pending migrations\n");
        }
        for name in &pending {
            let _ = writeln!(out, "Would apply {}", name);
        }
        return Ok(out);
    }

    if args.rollback {
        return Ok(match manager.rollback(migrations).await.context("Rolling back migrations")? {
            Some(name) => format!("Rolled back {}\n", name),
            None => "Nothing to roll back\n".to_owned(),
        });
    }

    let summary = manager.run(migrations).await.context("Applying migrations")?;
    info!(
        target: "migrate",
        applied = summary.applied.len(),
        skipped = summary.skipped.len(),
        "Migrations completed successfully"
    );
    Ok(format!(
        "Applied {} migration(s), {} already applied\n",
        summary.applied.len(),
        summary.skipped.len()
    ))
}

/// Render applied migrations oldest first, one per line.
pub fn format_status(records: &[MigrationRecord]) -> String {
    if records.is_empty() {
        return "No migrations applied\n".to_owned();
    }
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "{:<40} {}", record.name, record.applied_at.to_rfc3339());
    }
    out
}
