use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoadError {
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("endpoints must be unlocked before reversing")]
    EndpointsLocked,

    #[error("Handle {0} is locked to another curve")]
    HandleLocked(String),

    #[error("Lock would close a cycle: {0}")]
    LockCycle(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoadError>;
