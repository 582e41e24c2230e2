//! Error types for the admin registry

use crate::types::Operation;
use thiserror::Error;
use unicred_storage::StorageError;
use unicred_types::Address;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Caller failed the identity check for the operation.
    #[error("Unauthorized: {caller} may not call {operation}")]
    Unauthorized {
        caller: Address,
        operation: Operation,
    },

    #[error("Admin registry is not initialized")]
    NotInitialized,

    #[error("Admin registry is already initialized")]
    AlreadyInitialized,

    #[error("Invalid call signature")]
    InvalidSignature,

    #[error("Registry storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
