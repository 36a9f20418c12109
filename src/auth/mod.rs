pub mod password;
pub mod service;
pub mod token;

pub use password::{Argon2Hasher, PasswordError};
pub use service::{Authenticator, LoginSession};
pub use token::{Claims, TokenError, TokenSigner};

use thiserror::Error;

use crate::database::DatabaseError;
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email and wrong password are deliberately the same error.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    CurrentPasswordMismatch,

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Validation(ApiError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        AuthError::Validation(err)
    }
}
