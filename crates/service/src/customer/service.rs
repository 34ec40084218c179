use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use models::{customer::normalize_id, Customer, CustomerInput};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;

/// Result of a successful registration.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertedCustomer {
    pub customer: Customer,
    /// Collection size after the insert.
    pub total: usize,
}

/// Application service encapsulating customer business rules.
///
/// Every operation loads the collection fresh from the repository. Inserts
/// hold `write_lock` across load, duplicate check and save, so concurrent
/// registrations of the same id within this process cannot both succeed.
pub struct CustomerService {
    repo: Arc<dyn CustomerRepository>,
    write_lock: Mutex<()>,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl CustomerService {
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self::with_clock(repo, utc_today)
    }

    /// Same as `new` but with a fixed source for the creation date.
    pub fn with_clock(repo: Arc<dyn CustomerRepository>, today: fn() -> NaiveDate) -> Self {
        Self { repo, write_lock: Mutex::new(()), today }
    }

    pub async fn list(&self) -> Vec<Customer> {
        self.repo.load().await
    }

    /// Case-insensitive lookup; the stored id is always uppercase.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Customer, ServiceError> {
        let id = normalize_id(id);
        self.repo
            .load()
            .await
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::customer_not_found(&id))
    }

    /// Validate, reject duplicates, fill defaults, append and persist.
    #[instrument(skip(self, input), fields(id = ?input.id))]
    pub async fn insert(&self, input: CustomerInput) -> Result<InsertedCustomer, ServiceError> {
        input.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut customers = self.repo.load().await;

        let id = input.normalized_id().unwrap_or_default();
        if customers.iter().any(|c| c.id == id) {
            warn!(%id, "duplicate customer id rejected");
            return Err(ServiceError::Duplicate(input.id.unwrap_or(id)));
        }

        let customer = input.into_customer((self.today)())?;
        customers.push(customer.clone());
        self.repo.save(&customers).await?;

        let total = customers.len();
        info!(id = %customer.id, total, "customer added");
        Ok(InsertedCustomer { customer, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::customer_store::FileCustomerStore;
    use crate::memory::customer_store::InMemoryCustomerStore;
    use models::errors::ModelError;
    use serde_json::json;

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn input(v: serde_json::Value) -> CustomerInput {
        serde_json::from_value(v).unwrap()
    }

    fn c1() -> CustomerInput {
        input(json!({"id": "c1", "name": "A", "email": "a@x.com", "phone": "123"}))
    }

    #[tokio::test]
    async fn insert_fills_defaults_and_grows_list() -> Result<(), anyhow::Error> {
        let store = InMemoryCustomerStore::new();
        let svc = CustomerService::with_clock(store.clone(), fixed_day);

        assert_eq!(svc.list().await.len(), 0);
        let inserted = svc.insert(c1()).await?;
        assert_eq!(inserted.total, 1);
        assert_eq!(inserted.customer.id, "C1");
        assert_eq!(inserted.customer.address, "Not provided");
        assert_eq!(inserted.customer.membership, "Regular");
        assert_eq!(inserted.customer.total_spent, 0.0);
        assert_eq!(inserted.customer.join_date, Some(fixed_day()));
        assert_eq!(inserted.customer.last_purchase, Some(fixed_day()));

        assert_eq!(svc.list().await.len(), 1);
        assert_eq!(store.snapshot().await, vec![inserted.customer]);
        Ok(())
    }

    #[tokio::test]
    async fn get_by_id_is_case_insensitive() -> Result<(), anyhow::Error> {
        let svc = CustomerService::with_clock(InMemoryCustomerStore::new(), fixed_day);
        let inserted = svc.insert(c1()).await?;
        assert_eq!(svc.get_by_id("c1").await?, inserted.customer);
        assert_eq!(svc.get_by_id("C1").await?, inserted.customer);
        Ok(())
    }

    #[tokio::test]
    async fn missing_id_is_not_found_with_id_in_message() {
        let svc = CustomerService::new(InMemoryCustomerStore::new());
        let err = svc.get_by_id("zz9").await.unwrap_err();
        assert!(matches!(&err, ServiceError::NotFound(msg) if msg == "Customer ZZ9 not found"));
    }

    #[tokio::test]
    async fn duplicate_id_any_case_is_rejected_without_writing() -> Result<(), anyhow::Error> {
        let store = InMemoryCustomerStore::new();
        let svc = CustomerService::with_clock(store.clone(), fixed_day);
        svc.insert(c1()).await?;
        let before = store.snapshot().await;

        let dup = input(json!({"id": "C1", "name": "B", "email": "b@x.com", "phone": "9"}));
        let err = svc.insert(dup).await.unwrap_err();
        assert!(matches!(&err, ServiceError::Duplicate(id) if id == "C1"));
        assert_eq!(store.snapshot().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected_without_writing() -> Result<(), anyhow::Error> {
        let store = InMemoryCustomerStore::new();
        let svc = CustomerService::new(store.clone());
        svc.insert(c1()).await?;
        let before = store.snapshot().await;

        for field in ["id", "name", "email", "phone"] {
            let mut body = json!({"id": "c2", "name": "B", "email": "b@x.com", "phone": "9"});
            body.as_object_mut().unwrap().remove(field);
            let err = svc.insert(input(body)).await.unwrap_err();
            assert!(
                matches!(&err, ServiceError::Model(ModelError::MissingFields(f)) if f == &vec![field]),
                "unexpected error for {field}: {err}"
            );
        }
        assert_eq!(store.snapshot().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_storage_error() -> Result<(), anyhow::Error> {
        let store = InMemoryCustomerStore::new();
        let svc = CustomerService::new(store.clone());
        store.fail_saves(true);
        assert!(matches!(svc.insert(c1()).await, Err(ServiceError::Storage(_))));
        assert!(store.snapshot().await.is_empty());

        store.fail_saves(false);
        assert_eq!(svc.insert(c1()).await?.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_id_admit_exactly_one() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_race_{}.json", uuid::Uuid::new_v4()));
        let svc = Arc::new(CustomerService::new(FileCustomerStore::new(&tmp)));

        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = Arc::clone(&svc);
            let id = if i % 2 == 0 { "race" } else { "RACE" };
            handles.push(tokio::spawn(async move {
                svc.insert(input(json!({"id": id, "name": "R", "email": "r@x.com", "phone": "1"}))).await
            }));
        }

        let mut ok = 0;
        let mut dup = 0;
        for h in handles {
            match h.await? {
                Ok(_) => ok += 1,
                Err(ServiceError::Duplicate(_)) => dup += 1,
                Err(e) => return Err(e.into()),
            }
        }
        assert_eq!((ok, dup), (1, 15));
        assert_eq!(svc.list().await.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn preexisting_records_are_kept_in_order() -> Result<(), anyhow::Error> {
        let seed = c1().into_customer(fixed_day())?;
        let store = InMemoryCustomerStore::with_customers(vec![seed.clone()]);
        let svc = CustomerService::with_clock(store.clone(), fixed_day);

        let second = svc
            .insert(input(json!({"id": "c2", "name": "B", "email": "b@x.com", "phone": "2", "totalSpent": "250.5"})))
            .await?;
        assert_eq!(second.total, 2);
        assert_eq!(second.customer.total_spent, 250.5);
        let ids: Vec<_> = svc.list().await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
        Ok(())
    }

    #[tokio::test]
    async fn insert_keeps_partial_records_already_on_disk() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_partial_{}.json", uuid::Uuid::new_v4()));
        let seed = json!({
            "customers": [
                {
                    "id": "C1", "name": "A", "email": "a@x.com", "phone": "1",
                    "address": "1 Main St", "membership": "Gold", "totalSpent": 40,
                    "joinDate": "2025-01-01", "lastPurchase": "2025-02-01"
                },
                {"id": "C2", "name": "B", "email": "b@x.com", "phone": 5550002, "joinDate": "2025-01-05", "referral": "C1"}
            ]
        });
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&seed)?).await?;

        let svc = CustomerService::with_clock(FileCustomerStore::new(&tmp), fixed_day);
        assert_eq!(svc.list().await.len(), 2);

        let inserted = svc
            .insert(input(json!({"id": "c3", "name": "C", "email": "c@x.com", "phone": "3"})))
            .await?;
        assert_eq!(inserted.total, 3);

        let raw: serde_json::Value = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        let ids: Vec<_> = raw["customers"]
            .as_array()
            .map(|a| a.iter().map(|c| c["id"].clone()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec![json!("C1"), json!("C2"), json!("C3")]);
        // the untouched records keep what they had, including fields this crate does not model
        assert_eq!(raw["customers"][0]["membership"], "Gold");
        assert_eq!(raw["customers"][0]["lastPurchase"], "2025-02-01");
        assert_eq!(raw["customers"][1]["referral"], "C1");
        assert_eq!(raw["customers"][1]["joinDate"], "2025-01-05");
        assert!(raw["customers"][1].get("lastPurchase").is_none());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
