use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for plaintext password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must not be empty")]
    Empty,
}

/// Outward error classes. Every `IdentityError` belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Unauthorized,
    Internal,
}

/// Top-level error for all identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("User already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("User does not exist: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IdentityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidUserId(_)
            | IdentityError::InvalidUsername(_)
            | IdentityError::InvalidPassword(_) => ErrorKind::Validation,
            IdentityError::UsernameAlreadyExists(_) => ErrorKind::Conflict,
            IdentityError::NotFound(_) => ErrorKind::NotFound,
            IdentityError::InvalidCredentials => ErrorKind::Unauthorized,
            IdentityError::Hashing(_)
            | IdentityError::TokenSigning(_)
            | IdentityError::DatabaseError(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        IdentityError::DatabaseError(err.to_string())
    }
}
