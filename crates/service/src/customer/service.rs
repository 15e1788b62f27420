use std::sync::Arc;

use common::metrics::record_customer_operation;
use tracing::{debug, info, instrument};

use super::domain::{CustomerRequest, CustomerResponse};
use super::repository::CustomerRepository;
use crate::errors::ServiceError;

/// Customer lifecycle: the single authority for mutations and invariant checks.
///
/// Each call is one attempt against the store; errors are returned, never
/// handled here.
pub struct CustomerService<R: CustomerRepository + ?Sized> {
    repo: Arc<R>,
}

fn require_positive(id: i64) -> Result<(), ServiceError> {
    if id <= 0 {
        return Err(ServiceError::InvalidId(id));
    }
    Ok(())
}

fn observe<T>(operation: &'static str, res: Result<T, ServiceError>) -> Result<T, ServiceError> {
    match &res {
        Ok(_) => record_customer_operation(operation, "ok"),
        Err(e) => {
            debug!(operation, kind = e.kind().as_str(), error = %e, "customer_operation_failed");
            record_customer_operation(operation, e.kind().as_str());
        }
    }
    res
}

impl<R: CustomerRepository + ?Sized> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All live customers.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CustomerResponse>, ServiceError> {
        let res = self.repo.find_all().await;
        observe("list", res.map(|rows| rows.into_iter().map(CustomerResponse::from).collect()))
    }

    /// Fetch one customer.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{CustomerService, repository::memory::InMemoryCustomerRepository};
    /// use service::errors::ErrorKind;
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(InMemoryCustomerRepository::new()));
    /// let err = tokio_test::block_on(svc.get(1)).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    /// let err = tokio_test::block_on(svc.get(0)).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<CustomerResponse, ServiceError> {
        observe("get", self.get_inner(id).await)
    }

    async fn get_inner(&self, id: i64) -> Result<CustomerResponse, ServiceError> {
        require_positive(id)?;
        let found = self.repo.find_by_id(id).await?.ok_or(ServiceError::not_found("customer", id))?;
        Ok(found.into())
    }

    /// Create a customer with a fresh id.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{CustomerService, CustomerRequest, repository::memory::InMemoryCustomerRepository};
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(InMemoryCustomerRepository::new()));
    /// let created = tokio_test::block_on(svc.create(CustomerRequest::new("John", "Doe", "john@example.com"))).unwrap();
    /// assert_eq!(created.id, 1);
    /// assert_eq!(created.created_by, "system");
    /// ```
    #[instrument(skip(self, request), fields(email = ?request.email))]
    pub async fn create(&self, request: CustomerRequest) -> Result<CustomerResponse, ServiceError> {
        observe("create", self.create_inner(request).await)
    }

    async fn create_inner(&self, request: CustomerRequest) -> Result<CustomerResponse, ServiceError> {
        let draft = request.into_draft()?;
        if self.repo.exists_by_email(&draft.email).await? {
            return Err(ServiceError::EmailExists(draft.email));
        }
        // the store re-checks under its unique constraint
        let created = self.repo.insert(draft).await?;
        info!(customer_id = created.id, "customer_created");
        Ok(created.into())
    }

    /// Replace the five business fields of customer `id`.
    #[instrument(skip(self, request), fields(email = ?request.email))]
    pub async fn update(&self, id: i64, request: CustomerRequest) -> Result<CustomerResponse, ServiceError> {
        observe("update", self.update_inner(id, request).await)
    }

    async fn update_inner(&self, id: i64, request: CustomerRequest) -> Result<CustomerResponse, ServiceError> {
        require_positive(id)?;
        let draft = request.into_draft()?;
        let mut customer = self.repo.find_by_id(id).await?.ok_or(ServiceError::not_found("customer", id))?;
        if customer.email != draft.email && self.repo.exists_by_email(&draft.email).await? {
            return Err(ServiceError::EmailExists(draft.email));
        }
        customer.apply(draft);
        let updated = self.repo.update(customer).await?;
        info!(customer_id = updated.id, version = updated.version, "customer_updated");
        Ok(updated.into())
    }

    /// Remove customer `id` for good.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        observe("delete", self.delete_inner(id).await)
    }

    async fn delete_inner(&self, id: i64) -> Result<(), ServiceError> {
        require_positive(id)?;
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("customer", id));
        }
        if !self.repo.delete_by_id(id).await? {
            // removed by someone else in between
            return Err(ServiceError::not_found("customer", id));
        }
        info!(customer_id = id, "customer_deleted");
        Ok(())
    }
}
