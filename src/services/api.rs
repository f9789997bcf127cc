use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::errors::{AppError, Result};
use crate::models::feed::{
    ApiResponse, CirclePost, Comment, CreateCirclePost, CreateComment, CreateMission,
    CreateReflection, ItemKind, Mission, Notification, Reflection,
};
use crate::models::user::{AuthResponse, RegisterRequest, VerifyOtpRequest};

/// Remote collaborator contract for the ELEVATE backend.
///
/// Create operations return `Ok(None)` when the server accepted the request
/// but did not return a well-formed entity; callers then fall back to a full
/// reload through the matching list operation.
#[async_trait]
pub trait ElevateApi: Send + Sync {
    async fn create_comment(&self, req: &CreateComment) -> Result<Option<Comment>>;
    async fn list_comments(&self, item_type: ItemKind, item_id: &str) -> Result<Vec<Comment>>;

    async fn create_circle_post(&self, req: &CreateCirclePost) -> Result<Option<CirclePost>>;
    async fn list_circle_posts(&self, circle_id: &str) -> Result<Vec<CirclePost>>;

    async fn create_mission(&self, req: &CreateMission) -> Result<Option<Mission>>;
    async fn list_missions(&self) -> Result<Vec<Mission>>;

    async fn create_reflection(&self, req: &CreateReflection) -> Result<Option<Reflection>>;
    async fn list_reflections(&self) -> Result<Vec<Reflection>>;

    async fn request_otp(&self, req: &RegisterRequest) -> Result<()>;
    async fn verify_otp(&self, req: &VerifyOtpRequest) -> Result<AuthResponse>;

    async fn list_notifications(&self) -> Result<Vec<Notification>>;
}

pub struct ElevateHttpApi {
    base_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl ElevateHttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
            token: RwLock::new(None),
        })
    }

    /// Store the bearer token once OTP verification has produced one.
    pub fn set_token(&self, token: String) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    fn bearer(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = self.bearer() {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = remote_message(response).await;
            return Err(AppError::remote(status.as_u16(), message));
        }

        let envelope: ApiResponse<R> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| AppError::remote(status.as_u16(), "Response missing data"))
    }

    /// POST and parse the `{ success, data, message }` envelope, tolerating
    /// an absent or malformed `data` payload (mapped to `Ok(None)`).
    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<R>> {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = self.bearer() {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = remote_message(response).await;
            return Err(AppError::remote(status.as_u16(), message));
        }

        // A success status with an undecodable body still means the create
        // happened server-side; report a missing entity so callers take the
        // reload fallback instead of rolling back.
        let entity = match response.json::<ApiResponse<Value>>().await {
            Ok(envelope) => envelope
                .data
                .and_then(|data| serde_json::from_value(data).ok()),
            Err(_) => None,
        };
        Ok(entity)
    }
}

async fn remote_message(response: reqwest::Response) -> String {
    match response.json::<ApiResponse<Value>>().await {
        Ok(envelope) => envelope
            .message
            .unwrap_or_else(|| "Request failed".to_string()),
        Err(_) => "Request failed".to_string(),
    }
}

#[async_trait]
impl ElevateApi for ElevateHttpApi {
    async fn create_comment(&self, req: &CreateComment) -> Result<Option<Comment>> {
        let path = format!(
            "/api/{}/{}/comments",
            req.item_type.as_path_segment(),
            req.item_id
        );
        self.post_json(&path, req).await
    }

    async fn list_comments(&self, item_type: ItemKind, item_id: &str) -> Result<Vec<Comment>> {
        let path = format!("/api/{}/{}/comments", item_type.as_path_segment(), item_id);
        self.get_json(&path).await
    }

    async fn create_circle_post(&self, req: &CreateCirclePost) -> Result<Option<CirclePost>> {
        let path = format!("/api/circles/{}/posts", req.circle_id);
        self.post_json(&path, req).await
    }

    async fn list_circle_posts(&self, circle_id: &str) -> Result<Vec<CirclePost>> {
        let path = format!("/api/circles/{}/posts", circle_id);
        self.get_json(&path).await
    }

    async fn create_mission(&self, req: &CreateMission) -> Result<Option<Mission>> {
        self.post_json("/api/missions", req).await
    }

    async fn list_missions(&self) -> Result<Vec<Mission>> {
        self.get_json("/api/missions").await
    }

    async fn create_reflection(&self, req: &CreateReflection) -> Result<Option<Reflection>> {
        self.post_json("/api/reflections", req).await
    }

    async fn list_reflections(&self) -> Result<Vec<Reflection>> {
        self.get_json("/api/reflections").await
    }

    async fn request_otp(&self, req: &RegisterRequest) -> Result<()> {
        self.post_json::<_, Value>("/api/auth/register", req)
            .await
            .map(|_| ())
    }

    async fn verify_otp(&self, req: &VerifyOtpRequest) -> Result<AuthResponse> {
        let auth: Option<AuthResponse> = self.post_json("/api/auth/verify-otp", req).await?;
        auth.ok_or_else(|| AppError::remote(200, "Verification response missing credentials"))
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.get_json("/api/notifications").await
    }
}
