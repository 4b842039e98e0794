//! Error taxonomy shared by the repositories and the token service.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::auth::TokenError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Structural or business validation failed. Never retried.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// The referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness or duplicate-edge violation.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("database error: {0}")]
    Database(#[source] DieselError),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Seed(String),
}

impl Error {
    /// Builds an `Invalid` error for a single field.
    pub fn invalid(field: &'static str, code: &'static str, message: &'static str) -> Error {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        Error::Invalid(errors)
    }

    /// Only unexpected store failures may be retried by a caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Pool(_))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Error {
        Error::Invalid(errors)
    }
}

impl From<DieselError> for Error {
    fn from(error: DieselError) -> Error {
        match error {
            DieselError::NotFound => Error::NotFound("record"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Error::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                Error::NotFound("referenced record")
            }
            other => Error::Database(other),
        }
    }
}
