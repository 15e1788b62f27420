use sea_orm::DatabaseConnection;

use crate::customer::domain::{Customer, CustomerDraft};
use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;
use models::errors::ModelError;

/// Postgres-backed store. Uniqueness comes from the partial unique index on
/// `customers.email`; concurrent updates are caught by the version column.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn map_write_err(e: ModelError, email: &str) -> ServiceError {
    match e {
        ModelError::UniqueViolation(_) => ServiceError::EmailExists(email.to_string()),
        ModelError::StaleVersion { id } => ServiceError::StaleVersion { id },
        other => ServiceError::Model(other),
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, ServiceError> {
        let rows = models::customer::find_all_live(&self.db).await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, ServiceError> {
        Ok(models::customer::find_by_id(&self.db, id).await?.map(Customer::from))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        Ok(models::customer::exists_by_email(&self.db, email).await?)
    }

    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, ServiceError> {
        let created = models::customer::insert(&self.db, (&draft).into())
            .await
            .map_err(|e| map_write_err(e, &draft.email))?;
        Ok(created.into())
    }

    async fn update(&self, customer: Customer) -> Result<Customer, ServiceError> {
        let fields = models::customer::Fields {
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email.clone(),
            phone: customer.phone,
            address: customer.address,
        };
        let updated = models::customer::update(&self.db, customer.id, customer.version, fields)
            .await
            .map_err(|e| map_write_err(e, &customer.email))?;
        Ok(updated.into())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(models::customer::hard_delete(&self.db, id).await?)
    }
}
