use thiserror::Error;

/// All the ways things can go wrong in ShelfLife
///
/// Most of these never reach the user: validation misses and bad saved data
/// are turned into "do nothing" or "use the seed set" long before that.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Advice request failed: {0}")]
    AdviceError(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid value: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
