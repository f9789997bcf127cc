// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Only mentors and admins can comment")]
    StaffOnly,

    #[error("You must be a member of this circle to post")]
    NotMember,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Resend is not available yet")]
    ResendNotReady,

    #[error("Remote API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpClientError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl AppError {
    /// True when the failure came from an authorization rejection, so callers
    /// can surface the role-specific message instead of the generic one.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            AppError::StaffOnly | AppError::NotMember | AppError::Remote { status: 403, .. }
        )
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        AppError::SessionError(msg.into())
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        AppError::Remote {
            status,
            message: message.into(),
        }
    }
}

// Manual From implementations
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpClientError(format!("HTTP request failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
