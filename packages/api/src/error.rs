//! Error taxonomy shared by the services and the HTTP layer.

use store::{StoreError, UniqueField};
use thiserror::Error;

/// Authentication failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Login required")]
    LoginRequired,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or out of bounds.
    #[error("{0}")]
    Validation(String),
    /// A unique value (username, email) is already taken.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error("token issuance failed: {0}")]
    Token(String),
    #[error("session error: {0}")]
    Session(String),
    #[error(transparent)]
    Store(StoreError),
}

impl AppError {
    /// Whether the error is caused by user input rather than a backend failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Conflict(_) | AppError::Auth(_)
        )
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(UniqueField::Username) => {
                AppError::Conflict("This username is already taken".to_string())
            }
            StoreError::Conflict(UniqueField::Email) => {
                AppError::Conflict("This email is already registered".to_string())
            }
            other => AppError::Store(other),
        }
    }
}
