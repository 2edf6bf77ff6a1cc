use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::trip::TripId;

/// Failures reported by the persistence collaborators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("trip `{trip_id}` not found")]
    NotFound { trip_id: TripId },
    #[error("{operation} query failed: {message}")]
    Query { operation: String, message: String },
    #[error("trip store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn query(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Failure to record a validation in the audit trail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("audit record rejected: {0}")]
    Rejected(String),
}

/// Invalid or unreadable validation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors surfaced by the fleet-wide entry point.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid validation config: {0}")]
    Config(#[from] ConfigError),
    #[error("look-back of {days} days from {now} is out of range")]
    LookbackOutOfRange { now: DateTime<Utc>, days: u32 },
    #[error("failed to list recent trips: {0}")]
    TripListing(#[source] RepositoryError),
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}
