use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{Author, CurrentUser};

const PROVISIONAL_PREFIX: &str = "tmp-";

/// Temporary identifier for an entity shown before server confirmation.
/// UUID-backed so two rapid submits can never collide, and prefixed so a
/// provisional entry is recognizable for later replacement or removal.
pub fn provisional_id() -> String {
    format!("{}{}", PROVISIONAL_PREFIX, Uuid::new_v4())
}

pub fn is_provisional_id(id: &str) -> bool {
    id.starts_with(PROVISIONAL_PREFIX)
}

/// What a comment hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Mission,
    Project,
    Reflection,
}

impl ItemKind {
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            ItemKind::Mission => "missions",
            ItemKind::Project => "projects",
            ItemKind::Reflection => "reflections",
        }
    }
}

// ========== FEED ENTITIES ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

impl Comment {
    pub fn provisional(content: &str, user: &CurrentUser) -> Self {
        Self {
            id: provisional_id(),
            content: content.to_string(),
            created_at: Utc::now(),
            author: user.as_author(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CirclePost {
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

impl CirclePost {
    pub fn provisional(content: &str, user: &CurrentUser) -> Self {
        Self {
            id: provisional_id(),
            content: content.to_string(),
            created_at: Utc::now(),
            author: user.as_author(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

impl Mission {
    pub fn provisional(title: &str, user: &CurrentUser) -> Self {
        Self {
            id: provisional_id(),
            title: title.to_string(),
            description: None,
            created_at: Utc::now(),
            author: user.as_author(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

impl Reflection {
    pub fn provisional(content: &str, user: &CurrentUser) -> Self {
        Self {
            id: provisional_id(),
            content: content.to_string(),
            created_at: Utc::now(),
            author: user.as_author(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub read: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// ========== REQUEST DTOS ==========

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateComment {
    #[serde(rename = "itemType")]
    pub item_type: ItemKind,
    #[serde(rename = "itemId")]
    pub item_id: String,
    #[validate(length(min = 1, max = 500, message = "Comment must be 1-500 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateCirclePost {
    #[serde(rename = "circleId")]
    pub circle_id: String,
    #[validate(length(min = 1, message = "Post cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateMission {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateReflection {
    #[validate(length(min = 1, message = "Reflection cannot be empty"))]
    pub content: String,
}

// ========== API RESPONSE ENVELOPE ==========

/// The backend wraps every payload in `{ success, data, message }`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}
