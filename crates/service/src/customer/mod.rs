pub mod repository;
pub mod service;

pub use repository::CustomerRepository;
pub use service::{CustomerService, InsertedCustomer};
