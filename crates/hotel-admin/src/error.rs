//! Add-hotel error taxonomy and its HTTP mapping

use hotel_auth::AuthError;
use lambda_http::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// Missing, malformed or unverifiable bearer token
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but lacks the admin group
    #[error("{0}")]
    Forbidden(String),

    /// Malformed or incomplete form
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Configuration(String),
}

impl AdminError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Upstream(_) | Self::Configuration(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn admin_required(group: &str) -> Self {
        Self::Forbidden(format!("Unauthorized, Must be a member of {group} Group."))
    }
}

impl From<AuthError> for AdminError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::KeyNotFound { .. } | AuthError::InvalidToken(_) => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::Forbidden(reason) => Self::Forbidden(reason),
            AuthError::Upstream(detail) => Self::Upstream(detail),
            AuthError::Configuration(detail) => Self::Configuration(detail),
        }
    }
}
