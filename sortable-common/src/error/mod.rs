use std::fmt::Debug;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database Error: {0}")]
    Database(String),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resource Not Found: {resource_type} with ID {resource_id}")]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was caused by the request itself
    /// (bad target position, record missing from scope)
    /// rather than by the backing store.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::NotFound { .. })
    }

    pub fn record_not_found(record_id: i64) -> Self {
        Error::NotFound {
            resource_type: "SortableRecord".into(),
            resource_id: record_id.to_string(),
        }
    }
}
