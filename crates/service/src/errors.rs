use thiserror::Error;

use crate::validation::ValidationErrors;

/// Abstract failure categories, independent of any transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Conflict,
    ValidationFailed,
    Unexpected,
}

impl ErrorKind {
    /// Stable snake_case label, used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid customer id: {0}")]
    InvalidId(i64),
    #[error("customer request is missing")]
    MissingRequest,
    #[error("email already exists: {0}")]
    EmailExists(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("customer {id} was modified concurrently")]
    StaleVersion { id: i64 },
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: i64) -> Self { Self::NotFound { resource, id } }

    pub fn kind(&self) -> ErrorKind {
        use models::errors::ModelError;
        match self {
            ServiceError::InvalidId(_) | ServiceError::MissingRequest => ErrorKind::InvalidArgument,
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::EmailExists(_) | ServiceError::StaleVersion { .. } => ErrorKind::Conflict,
            ServiceError::Model(ModelError::UniqueViolation(_) | ModelError::StaleVersion { .. }) => ErrorKind::Conflict,
            ServiceError::Validation(_) => ErrorKind::ValidationFailed,
            ServiceError::Db(_) | ServiceError::Model(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(e: ValidationErrors) -> Self { ServiceError::Validation(e) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Violation;
    use models::errors::ModelError;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(ServiceError::InvalidId(0).kind(), ErrorKind::InvalidArgument);
        assert_eq!(ServiceError::MissingRequest.kind(), ErrorKind::InvalidArgument);
        assert_eq!(ServiceError::not_found("customer", 7).kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::EmailExists("a@b.c".into()).kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::StaleVersion { id: 1 }.kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::Db("down".into()).kind(), ErrorKind::Unexpected);
        assert_eq!(ServiceError::Model(ModelError::UniqueViolation("x".into())).kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::Model(ModelError::Db("x".into())).kind(), ErrorKind::Unexpected);

        let mut v = ValidationErrors::default();
        v.add("email", Violation::Required);
        assert_eq!(ServiceError::from(v).kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn display_keeps_context() {
        let e = ServiceError::not_found("customer", 42);
        assert_eq!(e.to_string(), "customer 42 not found");
        assert_eq!(ServiceError::StaleVersion { id: 3 }.to_string(), "customer 3 was modified concurrently");
    }
}
