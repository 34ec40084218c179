//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores that read and rewrite a whole JSON
//! document per operation.

pub mod json_document_store;
