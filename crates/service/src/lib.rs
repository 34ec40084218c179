//! Service layer for customer records.
//! - `customer` holds the business rules (validation, uniqueness, defaults).
//! - `file` and `memory` provide the `CustomerRepository` backends.
//! - `storage` holds the reusable whole-document JSON file store.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod customer;
pub mod file;
pub mod memory;
