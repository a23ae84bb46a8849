//! Error types for LOCKET

use thiserror::Error;

use crate::ContentId;

/// Core LOCKET errors
///
/// Every public operation handles its own faults at the component boundary;
/// none of these are allowed to terminate the hosting process.
#[derive(Error, Debug)]
pub enum LocketError {
    // Access errors
    #[error("Access denied: membership check failed")]
    AccessDenied,

    #[error("Access indeterminate: membership oracle could not be evaluated")]
    AccessIndeterminate,

    #[error("Membership oracle failure: {0}")]
    OracleFailure(String),

    // Registry errors
    #[error("Content not found: {0}")]
    NotFound(ContentId),

    #[error("Duplicate content id: {0}")]
    DuplicateId(ContentId),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    // Session errors
    #[error("No active session for actor")]
    NoSession,

    #[error("Submission has no collected assets")]
    EmptySubmission,

    // Delivery errors
    #[error("Asset send failure: {0}")]
    AssetSendFailure(String),
}

/// Result type for LOCKET operations
pub type LocketResult<T> = Result<T, LocketError>;
