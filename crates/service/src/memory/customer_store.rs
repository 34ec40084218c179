use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use models::Customer;
use tokio::sync::RwLock;
use tracing::error;

use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;

/// In-memory customer collection, mainly for tests.
///
/// `fail_saves(true)` makes every subsequent `save` return a storage error
/// without touching the held collection.
#[derive(Default)]
pub struct InMemoryCustomerStore {
    customers: RwLock<Vec<Customer>>,
    fail_saves: AtomicBool,
}

impl InMemoryCustomerStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_customers(customers: Vec<Customer>) -> Arc<Self> {
        Arc::new(Self { customers: RwLock::new(customers), fail_saves: AtomicBool::new(false) })
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of what is currently stored.
    pub async fn snapshot(&self) -> Vec<Customer> {
        self.customers.read().await.clone()
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerStore {
    async fn load(&self) -> Vec<Customer> {
        self.snapshot().await
    }

    async fn save(&self, customers: &[Customer]) -> Result<(), ServiceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            error!(count = customers.len(), "in-memory save rejected");
            return Err(ServiceError::Storage("in-memory store is read-only".into()));
        }
        *self.customers.write().await = customers.to_vec();
        Ok(())
    }
}
