use std::sync::Arc;

use configs::OrganisationInfo;
use service::customer::{CustomerRepository, CustomerService};
use service::notification::{CustomerNotificationService, NotificationClient};

/// Shared handler state. Backends are chosen at startup and erased behind trait objects.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService<dyn CustomerRepository>>,
    pub notifications: Arc<CustomerNotificationService<dyn NotificationClient>>,
    pub organisation: Option<Arc<OrganisationInfo>>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn CustomerRepository>,
        client: Arc<dyn NotificationClient>,
        organisation: Option<OrganisationInfo>,
    ) -> Self {
        Self {
            customers: Arc::new(CustomerService::new(repo)),
            notifications: Arc::new(CustomerNotificationService::new(client)),
            organisation: organisation.map(Arc::new),
        }
    }
}
