//! Store error types.

use ::error::AppError;

/// Errors raised by a [`DocumentStore`](crate::DocumentStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store connection failed: {message}")]
    Connection {
        message: String,
    },

    /// A write violated a unique index.
    #[error("Duplicate key in {collection}: {message}")]
    DuplicateKey {
        collection: String,
        message:    String,
    },

    /// A read, write or index operation was rejected.
    #[error("Store operation failed on {collection}: {message}")]
    Query {
        collection: String,
        message:    String,
    },

    /// A document could not be converted to or from BSON.
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
    },

    /// An identifier was not a valid ObjectId.
    #[error("Invalid id: {value}")]
    InvalidId {
        value: String,
    },

    /// A configuration value could not be parsed.
    #[error("Invalid value for {key}: {value}")]
    Configuration {
        key:   String,
        value: String,
    },
}

impl StoreError {
    pub(crate) fn query(collection: &str, message: impl ToString) -> Self {
        Self::Query {
            collection: collection.to_owned(),
            message:    message.to_string(),
        }
    }

    pub(crate) fn duplicate_key(collection: &str, message: impl ToString) -> Self {
        Self::DuplicateKey {
            collection: collection.to_owned(),
            message:    message.to_string(),
        }
    }

    /// Whether the error is a unique-index violation.
    #[inline]
    pub fn is_duplicate_key(&self) -> bool { matches!(self, Self::DuplicateKey { .. }) }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey {
                ..
            } => AppError::conflict(err),
            StoreError::InvalidId {
                value,
            } => AppError::bad_request(format!("Invalid id format: {}", value)),
            StoreError::Configuration {
                ..
            } => AppError::config(err),
            StoreError::Connection {
                ..
            }
            | StoreError::Query {
                ..
            }
            | StoreError::Serialization {
                ..
            } => AppError::database(err),
        }
    }
}
