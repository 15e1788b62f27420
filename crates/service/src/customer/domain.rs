use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{check_email, check_optional, check_required, ValidationErrors};

pub const FIRST_NAME_MAX: usize = 100;
pub const LAST_NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 255;
pub const PHONE_MAX: usize = 20;
pub const ADDRESS_MAX: usize = 500;

/// Create/update payload as received on the wire.
///
/// Every field is optional at this level so that a missing or `null` value
/// is reported as a validation failure instead of a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CustomerRequest {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            email: Some(email.to_string()),
            phone: None,
            address: None,
        }
    }

    /// Check all field constraints, reporting one violation per field.
    ///
    /// # Examples
    /// ```
    /// use service::customer::CustomerRequest;
    /// use service::validation::Violation;
    /// let req = CustomerRequest { email: Some("not-an-email".into()), ..CustomerRequest::new("John", "", "") };
    /// let errors = req.validate().unwrap_err();
    /// assert_eq!(errors.get("lastName"), Some(Violation::Required));
    /// assert_eq!(errors.get("email"), Some(Violation::InvalidEmail));
    /// assert_eq!(errors.get("firstName"), None);
    /// ```
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_required(&mut errors, "firstName", self.first_name.as_deref(), Some(FIRST_NAME_MAX));
        check_required(&mut errors, "lastName", self.last_name.as_deref(), Some(LAST_NAME_MAX));
        check_required(&mut errors, "email", self.email.as_deref(), Some(EMAIL_MAX));
        check_email(&mut errors, "email", self.email.as_deref());
        check_optional(&mut errors, "phone", self.phone.as_deref(), PHONE_MAX);
        check_optional(&mut errors, "address", self.address.as_deref(), ADDRESS_MAX);
        errors.into_result()
    }

    /// Validate and unwrap into the five business fields.
    pub fn into_draft(self) -> Result<CustomerDraft, ValidationErrors> {
        self.validate()?;
        Ok(CustomerDraft {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone,
            address: self.address,
        })
    }
}

/// Validated business fields of a customer, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A stored customer including the audit metadata set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
    pub is_deleted: bool,
    pub version: i64,
}

impl Customer {
    /// Overwrite the business fields; identity and audit data stay.
    pub fn apply(&mut self, draft: CustomerDraft) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.address = draft.address;
    }
}

impl From<models::customer::Model> for Customer {
    fn from(m: models::customer::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
            address: m.address,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
            created_by: m.created_by,
            updated_by: m.updated_by,
            is_deleted: m.is_deleted,
            version: m.version,
        }
    }
}

impl From<&CustomerDraft> for models::customer::Fields {
    fn from(d: &CustomerDraft) -> Self {
        Self {
            first_name: d.first_name.clone(),
            last_name: d.last_name.clone(),
            email: d.email.clone(),
            phone: d.phone.clone(),
            address: d.address.clone(),
        }
    }
}

/// External representation of a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
    pub is_deleted: bool,
    pub version: i64,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone: c.phone,
            address: c.address,
            created_at: c.created_at,
            updated_at: c.updated_at,
            created_by: c.created_by,
            updated_by: c.updated_by,
            is_deleted: c.is_deleted,
            version: c.version,
        }
    }
}

/// `yyyy-MM-dd HH:mm:ss`, UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|n| n.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
