use thiserror::Error;

/// Business errors for the identity workflows.
///
/// `InvalidCredentials` deliberately covers both "unknown identifier" and
/// "wrong password"; callers must not be able to tell which one failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("account already exists with {field}: '{value}'")]
    Conflict { field: &'static str, value: String },
    #[error("account not found")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict { .. } => 1002,
            AuthError::NotFound => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::Hash(_) => 1101,
            AuthError::Token(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}
