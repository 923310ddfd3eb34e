use thiserror::Error;

use super::token::TokenError;
use crate::errors::StorageError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, unparsable, or unverifiable credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Valid identity without the required standing.
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("no user registered for this email")]
    NoSuchIdentity,
    #[error("token error: {0}")]
    Token(#[from] TokenError),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Unauthorized(_) => 1004,
            AuthError::Forbidden(_) => 1005,
            AuthError::NoSuchIdentity => 1003,
            AuthError::Token(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Repository(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_kind() {
        let errors = [
            AuthError::Unauthorized("x".into()),
            AuthError::Forbidden("x".into()),
            AuthError::NoSuchIdentity,
            AuthError::Token(TokenError::Expired),
            AuthError::Repository("x".into()),
        ];
        let mut codes: Vec<u16> = errors.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert_eq!(AuthError::from(StorageError::Db("down".into())).code(), 1200);
    }
}
