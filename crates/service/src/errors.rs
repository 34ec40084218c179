use thiserror::Error;

/// Failures of customer operations. Read failures never appear here: the file
/// store degrades them to an empty collection.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("customer with ID {0} is already registered")]
    Duplicate(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn customer_not_found(id: &str) -> Self { Self::NotFound(format!("Customer {} not found", id)) }
}
