use crate::errors::ServiceError;
use async_trait::async_trait;
use models::Customer;

/// Trait abstraction for customer persistence.
///
/// The collection is always handled whole: `load` returns every record and
/// `save` replaces every record. Implementations can be file-backed or
/// in-memory.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Current collection. Read or parse failures are logged and yield an empty collection.
    async fn load(&self) -> Vec<Customer>;
    /// Replace the stored collection. Failures are logged and returned.
    async fn save(&self, customers: &[Customer]) -> Result<(), ServiceError>;
}
