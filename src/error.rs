use std::io;
use thiserror::Error;

/// Errors raised while validating or executing a corruption run.
#[derive(Debug, Error)]
pub enum CorruptError {
    /// A run parameter was rejected before the store was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The byte store could not be opened, read or written.
    ///
    /// Mutations that landed before the failure are not rolled back.
    #[error("store access failed: {0}")]
    StoreAccess(#[from] io::Error),

    /// The target holds no bytes, so there is no range to corrupt.
    #[error("target is empty, nothing to corrupt")]
    EmptyStore,
}

pub type Result<T> = std::result::Result<T, CorruptError>;
