use thiserror::Error;

use flipstock_core::DomainError;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated (named field: "barcode",
    /// "category name", "email").
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(what) => {
                DomainError::conflict(format!("duplicate {what}"))
            }
            RepositoryError::NotFound => DomainError::NotFound,
            RepositoryError::Storage(msg) => DomainError::invariant(msg),
        }
    }
}
