//! Customer record types shared by the service and HTTP layers.

pub mod errors;
pub mod customer;

pub use customer::{Customer, CustomerEnvelope, CustomerInput};
