//! Error types for token validation and authorization

use thiserror::Error;

/// Result type alias for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No verification key matches the token's key id
    #[error("No verification key found for kid {}", .kid.as_deref().unwrap_or("<none>"))]
    KeyNotFound { kid: Option<String> },

    /// Structure, signature, issuer, audience or expiry check failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token is valid but its groups do not satisfy the required group
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Secret store, storage or database call failed
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// HTTP status an API layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::KeyNotFound { .. } | Self::InvalidToken(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Upstream(_) | Self::Configuration(_) => 500,
        }
    }

    /// True for failures that mean "who are you?" rather than "you may not".
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == 401
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        let reason = match err.kind() {
            ErrorKind::ExpiredSignature => "token has expired".to_string(),
            ErrorKind::ImmatureSignature => "token is not yet valid".to_string(),
            ErrorKind::InvalidSignature => "signature verification failed".to_string(),
            ErrorKind::InvalidIssuer => "issuer mismatch".to_string(),
            ErrorKind::InvalidAudience => "audience mismatch".to_string(),
            ErrorKind::InvalidAlgorithm => "algorithm does not match key".to_string(),
            ErrorKind::MissingRequiredClaim(claim) => format!("missing required claim '{claim}'"),
            _ => err.to_string(),
        };
        Self::InvalidToken(reason)
    }
}
