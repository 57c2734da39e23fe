//! Migration error types.

use ::error::AppError;
use store::StoreError;

/// Failures reported by the [`MigrationManager`](crate::MigrationManager).
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The tracking collection could not be read or written.
    #[error("Migration store error: {0}")]
    Store(#[from] StoreError),

    /// A migration's `up` failed. Earlier migrations in the run stay applied.
    #[error("Migration {name} failed: {cause}")]
    MigrationFailure {
        name:  String,
        #[source]
        cause: StoreError,
    },

    /// `up` succeeded but the record could not be written.
    #[error("Failed to record migration {name}: {cause}")]
    RecordingFailure {
        name:  String,
        #[source]
        cause: StoreError,
    },

    /// A migration's `down` failed. Its record is kept.
    #[error("Rollback of {name} failed: {cause}")]
    RollbackFailure {
        name:  String,
        #[source]
        cause: StoreError,
    },

    /// The latest applied migration is missing from the supplied list.
    #[error("Migration {name} not found in migration list")]
    Configuration {
        name: String,
    },
}

impl MigrationError {
    /// Name of the migration involved, if the error concerns one.
    pub fn migration_name(&self) -> Option<&str> {
        match self {
            MigrationError::Store(_) => None,
            MigrationError::MigrationFailure {
                name, ..
            }
            | MigrationError::RecordingFailure {
                name, ..
            }
            | MigrationError::RollbackFailure {
                name, ..
            }
            | MigrationError::Configuration {
                name,
            } => Some(name),
        }
    }
}

impl From<MigrationError> for AppError {
    fn from(err: MigrationError) -> Self { AppError::migration(err) }
}
