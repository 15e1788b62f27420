//! Message catalog: error kinds and their context values to user-facing text.
//!
//! Templates use positional `{0}`, `{1}` placeholders.

use std::fmt::Display;

use service::errors::ServiceError;
use service::validation::Violation;

pub const CUSTOMER_NOT_FOUND: &str = "error.customer.notfound";
pub const RESOURCE_NOT_FOUND: &str = "error.resource.notfound";
pub const EMAIL_EXISTS: &str = "error.email.exists";
pub const ID_INVALID: &str = "error.id.invalid";
pub const REQUEST_MISSING: &str = "error.request.missing";
pub const REQUEST_MALFORMED: &str = "error.request.malformed";
pub const PATH_INVALID: &str = "error.path.invalid";
pub const QUERY_INVALID: &str = "error.query.invalid";
pub const CUSTOMER_STALE: &str = "error.customer.stale";
pub const CUSTOMER_CONFLICT: &str = "error.customer.conflict";
pub const VALIDATION_FAILED: &str = "error.validation";
pub const UNEXPECTED: &str = "error.unexpected";
pub const ORGANISATION_MISSING: &str = "error.organisation.missing";

static CATALOG: &[(&str, &str)] = &[
    (CUSTOMER_NOT_FOUND, "Customer with id {0} not found"),
    (RESOURCE_NOT_FOUND, "{0} with id {1} not found"),
    (EMAIL_EXISTS, "Email already exists: {0}"),
    (ID_INVALID, "Customer id must be a positive number, got {0}"),
    (REQUEST_MISSING, "Customer request cannot be null"),
    (REQUEST_MALFORMED, "Malformed request body: {0}"),
    (PATH_INVALID, "Invalid path parameter: {0}"),
    (QUERY_INVALID, "Invalid query parameter: {0}"),
    (CUSTOMER_STALE, "Customer with id {0} was modified concurrently"),
    (CUSTOMER_CONFLICT, "Customer conflicts with an existing record"),
    (VALIDATION_FAILED, "Validation failed"),
    (UNEXPECTED, "An unexpected error occurred"),
    (ORGANISATION_MISSING, "Organisation information is not configured"),
    ("validation.firstname.required", "First name is required"),
    ("validation.firstname.size", "First name must not exceed {0} characters"),
    ("validation.lastname.required", "Last name is required"),
    ("validation.lastname.size", "Last name must not exceed {0} characters"),
    ("validation.email.required", "Email is required"),
    ("validation.email.size", "Email must not exceed {0} characters"),
    ("validation.email.invalid", "Email must be a valid email address"),
    ("validation.phone.size", "Phone number must not exceed {0} characters"),
    ("validation.address.size", "Address must not exceed {0} characters"),
    ("validation.title.required", "Title is required"),
    ("validation.message.required", "Message is required"),
    ("validation.type.required", "Type is required"),
];

pub fn template(key: &str) -> Option<&'static str> {
    CATALOG.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Look up `key` and substitute `args` positionally. Unknown keys resolve to the key itself.
pub fn resolve(key: &str, args: &[&dyn Display]) -> String {
    let Some(tpl) = template(key) else { return key.to_string() };
    let mut out = tpl.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), &arg.to_string());
    }
    out
}

/// Text for one field violation, e.g. `firstName` + `Required` -> "First name is required".
pub fn violation(field: &str, v: Violation) -> String {
    let (suffix, max) = match v {
        Violation::Required => ("required", None),
        Violation::TooLong { max } => ("size", Some(max)),
        Violation::InvalidEmail => ("invalid", None),
    };
    let key = format!("validation.{}.{}", field.to_ascii_lowercase(), suffix);
    match (template(&key), max) {
        (Some(_), Some(max)) => resolve(&key, &[&max]),
        (Some(_), None) => resolve(&key, &[]),
        (None, _) => format!("{field} is {v}"),
    }
}

/// Top-level message for a service error.
pub fn for_error(err: &ServiceError) -> String {
    match err {
        ServiceError::InvalidId(id) => resolve(ID_INVALID, &[id]),
        ServiceError::MissingRequest => resolve(REQUEST_MISSING, &[]),
        ServiceError::EmailExists(email) => resolve(EMAIL_EXISTS, &[email]),
        ServiceError::NotFound { resource: "customer", id } => resolve(CUSTOMER_NOT_FOUND, &[id]),
        ServiceError::NotFound { resource, id } => resolve(RESOURCE_NOT_FOUND, &[resource, id]),
        ServiceError::StaleVersion { id } => resolve(CUSTOMER_STALE, &[id]),
        ServiceError::Validation(_) => resolve(VALIDATION_FAILED, &[]),
        ServiceError::Model(models::errors::ModelError::StaleVersion { id }) => resolve(CUSTOMER_STALE, &[id]),
        ServiceError::Model(models::errors::ModelError::UniqueViolation(_)) => resolve(CUSTOMER_CONFLICT, &[]),
        ServiceError::Db(_) | ServiceError::Model(_) => resolve(UNEXPECTED, &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_positional_arguments() {
        assert_eq!(resolve(CUSTOMER_NOT_FOUND, &[&1]), "Customer with id 1 not found");
        assert_eq!(resolve(RESOURCE_NOT_FOUND, &[&"Invoice", &2]), "Invoice with id 2 not found");
        assert_eq!(resolve("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn error_messages() {
        assert_eq!(for_error(&ServiceError::EmailExists("john@example.com".into())), "Email already exists: john@example.com");
        assert_eq!(for_error(&ServiceError::InvalidId(-3)), "Customer id must be a positive number, got -3");
        assert_eq!(for_error(&ServiceError::MissingRequest), "Customer request cannot be null");
        assert_eq!(for_error(&ServiceError::Db("secret dsn".into())), "An unexpected error occurred");
    }

    #[test]
    fn constraint_conflicts_read_as_conflicts() {
        use models::errors::ModelError;
        let err = ServiceError::Model(ModelError::UniqueViolation("uniq_customers_email_live".into()));
        assert_eq!(err.kind(), service::errors::ErrorKind::Conflict);
        assert_eq!(for_error(&err), "Customer conflicts with an existing record");
        // constraint detail never reaches the client
        assert!(!for_error(&err).contains("uniq_"));
    }

    #[test]
    fn violation_messages() {
        assert_eq!(violation("firstName", Violation::Required), "First name is required");
        assert_eq!(violation("lastName", Violation::TooLong { max: 100 }), "Last name must not exceed 100 characters");
        assert_eq!(violation("email", Violation::InvalidEmail), "Email must be a valid email address");
        assert_eq!(violation("type", Violation::Required), "Type is required");
        assert_eq!(violation("nickname", Violation::Required), "nickname is required");
    }
}
