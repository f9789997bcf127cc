//! Scripted stand-in for the backend used by the controller and OTP tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::{AppError, Result};
use crate::models::feed::{
    CirclePost, Comment, CreateCirclePost, CreateComment, CreateMission, CreateReflection,
    ItemKind, Mission, Notification, Reflection,
};
use crate::models::user::{
    AuthResponse, AuthenticatedUser, Author, RegisterRequest, Role, VerifyOtpRequest,
};
use crate::services::api::ElevateApi;

/// What a scripted operation does when called.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Succeed with the canned entity.
    Entity,
    /// Succeed but without a usable entity (`Ok(None)`).
    Missing,
    /// Fail with a 403.
    Forbidden,
    /// Fail with a 400.
    Rejected,
    /// Fail with a transport error.
    NetworkDown,
}

fn script_error(script: Script) -> AppError {
    match script {
        Script::Forbidden => AppError::remote(403, "Forbidden"),
        Script::Rejected => AppError::remote(400, "Invalid or expired OTP"),
        Script::NetworkDown => AppError::HttpClientError("connection refused".to_string()),
        Script::Entity | Script::Missing => unreachable!("not an error script"),
    }
}

fn staff_author() -> Author {
    Author {
        id: "staff-1".to_string(),
        name: "Ada".to_string(),
        email: Some("ada@example.edu".to_string()),
        avatar: None,
        role: Role::Mentor,
    }
}

pub struct MockApi {
    pub create_comment_calls: AtomicUsize,
    pub list_comment_calls: AtomicUsize,
    pub comment_script: Mutex<Script>,
    pub canned_comment: Mutex<Option<Comment>>,
    pub canned_comments: Mutex<Vec<Comment>>,

    pub create_post_calls: AtomicUsize,
    pub post_script: Mutex<Script>,
    pub canned_post: Mutex<Option<CirclePost>>,
    pub canned_posts: Mutex<Vec<CirclePost>>,

    pub mission_script: Mutex<Script>,
    pub canned_mission: Mutex<Option<Mission>>,
    pub canned_missions: Mutex<Vec<Mission>>,

    pub reflection_script: Mutex<Script>,
    pub canned_reflection: Mutex<Option<Reflection>>,
    pub canned_reflections: Mutex<Vec<Reflection>>,

    pub verify_calls: AtomicUsize,
    pub verify_script: Mutex<Script>,
    pub last_verify_code: Mutex<Option<String>>,
    pub canned_auth: Mutex<Option<AuthResponse>>,

    pub request_otp_calls: AtomicUsize,
    pub request_otp_script: Mutex<Script>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            create_comment_calls: AtomicUsize::new(0),
            list_comment_calls: AtomicUsize::new(0),
            comment_script: Mutex::new(Script::Entity),
            canned_comment: Mutex::new(None),
            canned_comments: Mutex::new(Vec::new()),

            create_post_calls: AtomicUsize::new(0),
            post_script: Mutex::new(Script::Entity),
            canned_post: Mutex::new(None),
            canned_posts: Mutex::new(Vec::new()),

            mission_script: Mutex::new(Script::Entity),
            canned_mission: Mutex::new(None),
            canned_missions: Mutex::new(Vec::new()),

            reflection_script: Mutex::new(Script::Entity),
            canned_reflection: Mutex::new(None),
            canned_reflections: Mutex::new(Vec::new()),

            verify_calls: AtomicUsize::new(0),
            verify_script: Mutex::new(Script::Entity),
            last_verify_code: Mutex::new(None),
            canned_auth: Mutex::new(None),

            request_otp_calls: AtomicUsize::new(0),
            request_otp_script: Mutex::new(Script::Entity),
        }
    }

    pub fn comment(id: &str, content: &str) -> Comment {
        Comment {
            id: id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            author: staff_author(),
        }
    }

    pub fn set_comment_entity(&self, id: &str, content: &str) {
        *self.canned_comment.lock().unwrap() = Some(Self::comment(id, content));
    }

    pub fn set_post_entity(&self, id: &str, content: &str) {
        *self.canned_post.lock().unwrap() = Some(CirclePost {
            id: id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            author: staff_author(),
        });
    }

    pub fn set_mission_entity(&self, id: &str, title: &str) {
        *self.canned_mission.lock().unwrap() = Some(Mission {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            created_at: Utc::now(),
            author: staff_author(),
        });
    }

    pub fn set_reflection_entity(&self, id: &str, content: &str) {
        *self.canned_reflection.lock().unwrap() = Some(Reflection {
            id: id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            author: staff_author(),
        });
    }

    pub fn set_auth(&self, token: &str, user_id: &str) {
        *self.canned_auth.lock().unwrap() = Some(AuthResponse {
            token: token.to_string(),
            user: AuthenticatedUser {
                id: user_id.to_string(),
                name: "Grace".to_string(),
                email: "grace@example.edu".to_string(),
                role: Role::Student,
            },
        });
    }

    fn scripted<T: Clone>(script: Script, canned: &Mutex<Option<T>>) -> Result<Option<T>> {
        match script {
            Script::Entity => Ok(canned.lock().unwrap().clone()),
            Script::Missing => Ok(None),
            other => Err(script_error(other)),
        }
    }
}

#[async_trait]
impl ElevateApi for MockApi {
    async fn create_comment(&self, _req: &CreateComment) -> Result<Option<Comment>> {
        self.create_comment_calls.fetch_add(1, Ordering::SeqCst);
        let script = *self.comment_script.lock().unwrap();
        Self::scripted(script, &self.canned_comment)
    }

    async fn list_comments(&self, _item_type: ItemKind, _item_id: &str) -> Result<Vec<Comment>> {
        self.list_comment_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.canned_comments.lock().unwrap().clone())
    }

    async fn create_circle_post(&self, _req: &CreateCirclePost) -> Result<Option<CirclePost>> {
        self.create_post_calls.fetch_add(1, Ordering::SeqCst);
        let script = *self.post_script.lock().unwrap();
        Self::scripted(script, &self.canned_post)
    }

    async fn list_circle_posts(&self, _circle_id: &str) -> Result<Vec<CirclePost>> {
        Ok(self.canned_posts.lock().unwrap().clone())
    }

    async fn create_mission(&self, _req: &CreateMission) -> Result<Option<Mission>> {
        let script = *self.mission_script.lock().unwrap();
        Self::scripted(script, &self.canned_mission)
    }

    async fn list_missions(&self) -> Result<Vec<Mission>> {
        Ok(self.canned_missions.lock().unwrap().clone())
    }

    async fn create_reflection(&self, _req: &CreateReflection) -> Result<Option<Reflection>> {
        let script = *self.reflection_script.lock().unwrap();
        Self::scripted(script, &self.canned_reflection)
    }

    async fn list_reflections(&self) -> Result<Vec<Reflection>> {
        Ok(self.canned_reflections.lock().unwrap().clone())
    }

    async fn request_otp(&self, _req: &RegisterRequest) -> Result<()> {
        self.request_otp_calls.fetch_add(1, Ordering::SeqCst);
        let script = *self.request_otp_script.lock().unwrap();
        match script {
            Script::Entity | Script::Missing => Ok(()),
            other => Err(script_error(other)),
        }
    }

    async fn verify_otp(&self, req: &VerifyOtpRequest) -> Result<AuthResponse> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_verify_code.lock().unwrap() = Some(req.otp.clone());
        let script = *self.verify_script.lock().unwrap();
        match script {
            Script::Entity => self
                .canned_auth
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| AppError::remote(200, "no canned auth")),
            Script::Missing => Err(AppError::remote(200, "Verification response missing credentials")),
            other => Err(script_error(other)),
        }
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        Ok(Vec::new())
    }
}
