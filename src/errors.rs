use thiserror::Error;
use uuid::Uuid;

/// Error type that captures profile, import and persistence failures.
///
/// The forecast computation itself never produces one of these; malformed
/// input is normalized before it reaches the engine.
#[derive(Debug, Error)]
pub enum CashflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid import: {0}")]
    InvalidImport(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
    #[error("Profile already exists: {0}")]
    ProfileExists(String),
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, CashflowError>;
