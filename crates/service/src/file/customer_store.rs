use std::{path::PathBuf, sync::Arc};
use models::{Customer, CustomerEnvelope};
use tracing::{error, warn};

use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;
use crate::storage::json_document_store::JsonDocumentStore;

/// File-backed customer collection.
/// Persists `{ "customers": [...] }` as a single JSON document.
#[derive(Clone)]
pub struct FileCustomerStore {
    store: JsonDocumentStore<CustomerEnvelope>,
}

impl FileCustomerStore {
    /// Point the store at a data file. The file is not touched until the first load or save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { store: JsonDocumentStore::new(path) })
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }
}

#[async_trait::async_trait]
impl CustomerRepository for FileCustomerStore {
    async fn load(&self) -> Vec<Customer> {
        match self.store.read().await {
            Ok(envelope) => envelope.customers,
            // missing file on first start, or a document that is not JSON
            Err(e) => {
                warn!(path = %self.path().display(), error = %e, "customer data unreadable; using empty collection");
                Vec::new()
            }
        }
    }

    async fn save(&self, customers: &[Customer]) -> Result<(), ServiceError> {
        let envelope = CustomerEnvelope { customers: customers.to_vec() };
        self.store.write(&envelope).await.inspect_err(|e| {
            error!(path = %self.path().display(), error = %e, "failed to save customer data");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn customer(id: &str) -> Customer {
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        Customer {
            id: id.into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "555".into(),
            address: "Not provided".into(),
            membership: "Regular".into(),
            total_spent: 10.0,
            join_date: Some(day),
            last_purchase: Some(day),
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn file_customer_store_round_trip() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_customers_{}.json", Uuid::new_v4()));
        let store = FileCustomerStore::new(&tmp);

        // missing file degrades to empty
        assert!(store.load().await.is_empty());

        store.save(&[customer("C1"), customer("C2")]).await?;
        let reloaded = FileCustomerStore::new(&tmp).load().await;
        assert_eq!(reloaded.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["C1", "C2"]);

        // on-disk shape is the envelope with camelCase fields
        let raw: serde_json::Value = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(raw["customers"][0]["totalSpent"], 10.0);
        assert_eq!(raw["customers"][1]["joinDate"], "2026-01-02");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_loads_as_empty() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_customers_bad_{}.json", Uuid::new_v4()));
        tokio::fs::write(&tmp, b"[this is not json").await?;
        let store = FileCustomerStore::new(&tmp);
        assert!(store.load().await.is_empty());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_into_missing_directory_is_an_error() {
        let tmp = std::env::temp_dir()
            .join(format!("svc_missing_{}", Uuid::new_v4()))
            .join("customers.json");
        let store = FileCustomerStore::new(&tmp);
        assert!(matches!(store.save(&[customer("C1")]).await, Err(ServiceError::Storage(_))));
    }
}
