use std::sync::Arc;

use service::customer::CustomerService;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<CustomerService>,
}

impl ServerState {
    pub fn new(customers: CustomerService) -> Self {
        Self { customers: Arc::new(customers) }
    }
}
