use async_trait::async_trait;

use super::domain::{Customer, CustomerDraft};
use crate::errors::ServiceError;

/// Record store for customers.
///
/// Implementations stamp audit metadata and enforce email uniqueness among
/// live records as a hard constraint: a colliding `insert`/`update` fails
/// with `ServiceError::EmailExists`. `update` is conditional on the
/// customer's `version` and fails with `ServiceError::StaleVersion` when the
/// stored row has moved on.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Live (not soft-deleted) customers ordered by id.
    async fn find_all(&self) -> Result<Vec<Customer>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, ServiceError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError>;
    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, ServiceError>;
    async fn update(&self, customer: Customer) -> Result<Customer, ServiceError>;
    /// Hard delete. Returns whether a record was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;
}

/// In-memory store, selected with `storage.backend = "memory"` and used by tests and doc examples
pub mod memory {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    /// Principal recorded in the audit columns.
    pub use models::customer::AUDITOR;

    #[derive(Default)]
    struct State {
        last_id: i64,
        rows: BTreeMap<i64, Customer>,
    }

    impl State {
        fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
            self.rows
                .values()
                .any(|c| !c.is_deleted && c.email == email && Some(c.id) != except)
        }
    }

    #[derive(Default)]
    pub struct InMemoryCustomerRepository {
        state: Mutex<State>,
    }

    impl InMemoryCustomerRepository {
        pub fn new() -> Self { Self::default() }
    }

    #[async_trait]
    impl CustomerRepository for InMemoryCustomerRepository {
        async fn find_all(&self) -> Result<Vec<Customer>, ServiceError> {
            let state = self.state.lock().await;
            Ok(state.rows.values().filter(|c| !c.is_deleted).cloned().collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, ServiceError> {
            let state = self.state.lock().await;
            Ok(state.rows.get(&id).cloned())
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
            let state = self.state.lock().await;
            Ok(state.email_taken(email, None))
        }

        async fn insert(&self, draft: CustomerDraft) -> Result<Customer, ServiceError> {
            let mut state = self.state.lock().await;
            if state.email_taken(&draft.email, None) {
                return Err(ServiceError::EmailExists(draft.email));
            }
            state.last_id += 1;
            let now = Utc::now();
            let customer = Customer {
                id: state.last_id,
                first_name: draft.first_name,
                last_name: draft.last_name,
                email: draft.email,
                phone: draft.phone,
                address: draft.address,
                created_at: now,
                updated_at: now,
                created_by: AUDITOR.to_string(),
                updated_by: AUDITOR.to_string(),
                is_deleted: false,
                version: 0,
            };
            state.rows.insert(customer.id, customer.clone());
            Ok(customer)
        }

        async fn update(&self, customer: Customer) -> Result<Customer, ServiceError> {
            let mut state = self.state.lock().await;
            let current_version = match state.rows.get(&customer.id) {
                Some(c) => c.version,
                None => return Err(ServiceError::not_found("customer", customer.id)),
            };
            if current_version != customer.version {
                return Err(ServiceError::StaleVersion { id: customer.id });
            }
            if state.email_taken(&customer.email, Some(customer.id)) {
                return Err(ServiceError::EmailExists(customer.email));
            }
            let Some(row) = state.rows.get_mut(&customer.id) else {
                return Err(ServiceError::not_found("customer", customer.id));
            };
            row.first_name = customer.first_name;
            row.last_name = customer.last_name;
            row.email = customer.email;
            row.phone = customer.phone;
            row.address = customer.address;
            row.updated_at = Utc::now();
            row.updated_by = AUDITOR.to_string();
            row.version += 1;
            Ok(row.clone())
        }

        async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
            let mut state = self.state.lock().await;
            Ok(state.rows.remove(&id).is_some())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn draft(email: &str) -> CustomerDraft {
            CustomerDraft {
                first_name: "John".into(),
                last_name: "Doe".into(),
                email: email.into(),
                phone: None,
                address: None,
            }
        }

        #[tokio::test]
        async fn ids_are_sequential_and_never_reused() {
            let repo = InMemoryCustomerRepository::new();
            let a = repo.insert(draft("a@example.com")).await.unwrap();
            let b = repo.insert(draft("b@example.com")).await.unwrap();
            assert_eq!((a.id, b.id), (1, 2));
            assert!(repo.delete_by_id(b.id).await.unwrap());
            let c = repo.insert(draft("c@example.com")).await.unwrap();
            assert_eq!(c.id, 3);
        }

        #[tokio::test]
        async fn insert_enforces_unique_email() {
            let repo = InMemoryCustomerRepository::new();
            repo.insert(draft("dup@example.com")).await.unwrap();
            let err = repo.insert(draft("dup@example.com")).await.unwrap_err();
            assert!(matches!(err, ServiceError::EmailExists(e) if e == "dup@example.com"));
            assert_eq!(repo.find_all().await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn email_match_is_case_sensitive() {
            let repo = InMemoryCustomerRepository::new();
            repo.insert(draft("john@example.com")).await.unwrap();
            assert!(repo.insert(draft("John@example.com")).await.is_ok());
        }

        #[tokio::test]
        async fn update_checks_version_and_bumps_it() {
            let repo = InMemoryCustomerRepository::new();
            let created = repo.insert(draft("v@example.com")).await.unwrap();

            let mut first = created.clone();
            first.first_name = "Jane".into();
            let updated = repo.update(first).await.unwrap();
            assert_eq!(updated.version, 1);
            assert_eq!(updated.created_at, created.created_at);

            let mut late = created.clone();
            late.first_name = "Late".into();
            let err = repo.update(late).await.unwrap_err();
            assert!(matches!(err, ServiceError::StaleVersion { id } if id == created.id));
            assert_eq!(repo.find_by_id(created.id).await.unwrap().unwrap().first_name, "Jane");
        }

        #[tokio::test]
        async fn update_rejects_email_of_another_row() {
            let repo = InMemoryCustomerRepository::new();
            repo.insert(draft("one@example.com")).await.unwrap();
            let mut two = repo.insert(draft("two@example.com")).await.unwrap();
            two.email = "one@example.com".into();
            let err = repo.update(two).await.unwrap_err();
            assert!(matches!(err, ServiceError::EmailExists(_)));
        }
    }
}
