//! Error types for Rehydrate
//!
//! Reconciliation itself never fails. These errors only come from the
//! edges: parsing raw signals and reading configuration.

use thiserror::Error;

/// Core Rehydrate errors
#[derive(Error, Debug)]
pub enum RehydrateError {
    // Signal errors
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Hydrate signal carries no payload")]
    MissingPayload,

    #[error("Hydrate payload must be an object, got {0}")]
    InvalidPayload(&'static str),

    // Configuration errors
    #[error("Unknown execution context: {0}")]
    UnknownContext(String),
}

/// Result type for Rehydrate operations
pub type RehydrateResult<T> = Result<T, RehydrateError>;
