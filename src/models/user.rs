use serde::{Deserialize, Serialize};
use validator::Validate;

/// Roles are a closed set so authorization gates can branch on capability
/// checks instead of string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
    Admin,
}

impl Role {
    /// Only staff may comment on missions, projects and reflections.
    pub fn can_comment(&self) -> bool {
        matches!(self, Role::Mentor | Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: Role,
}

/// The acting user on this device: who provisional entities are attributed
/// to, and whose role the authorization gates check.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
}

impl CurrentUser {
    pub fn as_author(&self) -> Author {
        Author {
            id: self.id.clone(),
            name: self.name.clone(),
            email: Some(self.email.clone()),
            avatar: self.avatar.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, Validate)]
pub struct VerifyOtpRequest {
    pub email: String,
    #[validate(length(min = 6, max = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}
