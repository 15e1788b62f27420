use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequestDoc {
    #[schema(example = "John", max_length = 100)]
    pub first_name: String,
    #[schema(example = "Doe", max_length = 100)]
    pub last_name: String,
    #[schema(example = "john@example.com", max_length = 255)]
    pub email: String,
    #[schema(max_length = 20)]
    pub phone: Option<String>,
    #[schema(max_length = 500)]
    pub address: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponseDoc {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[schema(example = "2025-07-25 17:30:00")]
    pub created_at: String,
    #[schema(example = "2025-07-25 17:30:00")]
    pub updated_at: String,
    pub created_by: String,
    pub updated_by: String,
    pub is_deleted: bool,
    pub version: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBodyDoc {
    #[schema(example = "2025-07-25T17:30:00.000")]
    pub timestamp: String,
    #[schema(example = 404)]
    pub status: u16,
    #[schema(example = "Not Found")]
    pub error: String,
    #[schema(example = "Customer with id 1 not found")]
    pub message: String,
    #[schema(example = "/api/v1/customers/1")]
    pub path: String,
    /// Field name to violation message; validation failures only
    pub details: Option<std::collections::BTreeMap<String, String>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequestDoc {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub action_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponseDoc {
    pub id: Option<i64>,
    pub recipient_id: Option<i64>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub action_url: Option<String>,
    pub read: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Organisation profile as configured under `[organisation]`.
#[derive(Serialize, ToSchema)]
pub struct OrganisationDoc {
    pub name: String,
    pub address: AddressDoc,
    pub contact: ContactDoc,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub social: Option<SocialDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct AddressDoc { pub street: String, pub city: String, pub state: String, pub zip: String }

#[derive(Serialize, ToSchema)]
pub struct ContactDoc { pub name: String, pub email: String }

#[derive(Serialize, ToSchema)]
pub struct SocialDoc { pub facebook: Option<String>, pub twitter: Option<String>, pub instagram: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::list,
        crate::routes::customers::get,
        crate::routes::customers::create,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::notifications::list,
        crate::routes::notifications::unread,
        crate::routes::notifications::count,
        crate::routes::notifications::send,
        crate::routes::notifications::mark_as_read,
        crate::routes::notifications::delete,
        crate::routes::organisation::get,
    ),
    components(
        schemas(
            HealthResponse,
            CustomerRequestDoc,
            CustomerResponseDoc,
            ErrorBodyDoc,
            SendNotificationRequestDoc,
            NotificationResponseDoc,
            OrganisationDoc,
            AddressDoc,
            ContactDoc,
            SocialDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers", description = "Customer lifecycle"),
        (name = "notifications", description = "Customer notifications, forwarded to the notification service"),
        (name = "organisation")
    )
)]
pub struct ApiDoc;
