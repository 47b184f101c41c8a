//! Unified error types for the todo service.

use thiserror::Error;

use crate::store::StorageOp;

/// Unified process-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage gateway error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Metrics recorder could not be built.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage gateway errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Identifier is not in the storage engine's native encoding.
    /// Raised before any query is issued.
    #[error("invalid todo id: {0:?}")]
    InvalidId(String),

    /// The underlying database operation failed.
    #[error("{op} failed: {reason}")]
    Storage {
        /// Operation that failed.
        op: StorageOp,
        /// Reason reported by the driver.
        reason: String,
    },
}

impl StoreError {
    /// Build a storage failure for `op` from any displayable driver error.
    pub fn storage(op: StorageOp, err: impl std::fmt::Display) -> Self {
        Self::Storage {
            op,
            reason: err.to_string(),
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_names_operation() {
        let err = StoreError::storage(StorageOp::Count, "connection reset");
        assert_eq!(err.to_string(), "count failed: connection reset");
    }

    #[test]
    fn store_error_converts_into_app_error() {
        let err: AppError = StoreError::InvalidId("nope".to_string()).into();
        assert!(matches!(err, AppError::Store(StoreError::InvalidId(_))));
    }
}
