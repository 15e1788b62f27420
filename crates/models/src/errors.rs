use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("row {id} changed since it was read")]
    StaleVersion { id: i64 },
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ModelError::UniqueViolation(detail),
            _ => ModelError::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_constraint_errors_map_to_db() {
        let err: ModelError = DbErr::RecordNotFound("customers".into()).into();
        assert!(matches!(err, ModelError::Db(msg) if msg.contains("customers")));
    }
}
