use std::sync::Arc;

use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::feed::{CirclePost, CreateCirclePost};
use crate::models::user::CurrentUser;
use crate::services::api::ElevateApi;
use crate::services::feed::OptimisticFeed;

/// Optimistic post feed for one peer circle. Same shape as the comment
/// thread, gated on circle membership instead of staff role; non-members are
/// never offered the composer, and a submit from one is rejected locally.
pub struct CircleFeed {
    api: Arc<dyn ElevateApi>,
    user: CurrentUser,
    circle_id: String,
    is_member: bool,
    feed: OptimisticFeed<CirclePost>,
    draft: String,
    in_flight: bool,
}

impl CircleFeed {
    pub fn new(
        api: Arc<dyn ElevateApi>,
        user: CurrentUser,
        circle_id: impl Into<String>,
        is_member: bool,
    ) -> Self {
        Self {
            api,
            user,
            circle_id: circle_id.into(),
            is_member,
            feed: OptimisticFeed::new(),
            draft: String::new(),
            in_flight: false,
        }
    }

    pub fn posts(&self) -> &[CirclePost] {
        self.feed.items()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Whether the composer is shown at all.
    pub fn can_post(&self) -> bool {
        self.is_member
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub async fn load(&mut self) -> Result<()> {
        let posts = self.api.list_circle_posts(&self.circle_id).await?;
        self.feed.replace_all(posts);
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<()> {
        let content = self.draft.trim().to_string();

        let request = CreateCirclePost {
            circle_id: self.circle_id.clone(),
            content: content.clone(),
        };
        request.validate()?;

        if !self.is_member {
            return Err(AppError::NotMember);
        }

        let submitted = std::mem::take(&mut self.draft);
        let temp_id = self
            .feed
            .insert_provisional(CirclePost::provisional(&content, &self.user));

        self.in_flight = true;
        let outcome = self.api.create_circle_post(&request).await;
        self.in_flight = false;

        match outcome {
            Ok(Some(post)) => {
                self.feed.confirm(&temp_id, post);
                Ok(())
            }
            Ok(None) => {
                tracing::warn!("create post returned no entity, reloading circle feed");
                if let Err(e) = self.load().await {
                    tracing::warn!("circle reload after create failed: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                self.feed.rollback(&temp_id);
                self.draft = submitted;
                if e.is_authorization() {
                    Err(AppError::NotMember)
                } else {
                    tracing::warn!("failed to create circle post: {}", e);
                    Err(e)
                }
            }
        }
    }
}
