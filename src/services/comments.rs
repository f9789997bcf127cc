use std::sync::Arc;

use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::feed::{Comment, CreateComment, ItemKind};
use crate::models::user::CurrentUser;
use crate::services::api::ElevateApi;
use crate::services::feed::OptimisticFeed;

/// Optimistic comment thread attached to one mission, project or reflection.
///
/// `submit` shows the comment immediately (provisional entry, draft cleared)
/// and reconciles once the create call resolves: confirmed in place on
/// success, rolled back with the draft restored on failure. Only mentors and
/// admins pass the authorization gate; a student is rejected before any
/// network call.
pub struct CommentThread {
    api: Arc<dyn ElevateApi>,
    user: CurrentUser,
    item_type: ItemKind,
    item_id: String,
    feed: OptimisticFeed<Comment>,
    draft: String,
    in_flight: bool,
}

impl CommentThread {
    pub fn new(
        api: Arc<dyn ElevateApi>,
        user: CurrentUser,
        item_type: ItemKind,
        item_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            user,
            item_type,
            item_id: item_id.into(),
            feed: OptimisticFeed::new(),
            draft: String::new(),
            in_flight: false,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        self.feed.items()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Whether the submit control should be disabled.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn can_comment(&self) -> bool {
        self.user.role.can_comment()
    }

    pub async fn load(&mut self) -> Result<()> {
        let comments = self.api.list_comments(self.item_type, &self.item_id).await?;
        self.feed.replace_all(comments);
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<()> {
        let content = self.draft.trim().to_string();

        let request = CreateComment {
            item_type: self.item_type,
            item_id: self.item_id.clone(),
            content: content.clone(),
        };
        request.validate()?;

        if !self.user.role.can_comment() {
            return Err(AppError::StaffOnly);
        }

        // Optimistic step: the provisional entry and the cleared draft are
        // both visible before the network call resolves.
        let submitted = std::mem::take(&mut self.draft);
        let temp_id = self
            .feed
            .insert_provisional(Comment::provisional(&content, &self.user));

        self.in_flight = true;
        let outcome = self.api.create_comment(&request).await;
        self.in_flight = false;

        match outcome {
            Ok(Some(comment)) => {
                tracing::debug!(id = %comment.id, "comment confirmed");
                self.feed.confirm(&temp_id, comment);
                Ok(())
            }
            Ok(None) => {
                // Server accepted but returned no usable entity; the list is
                // reloaded wholesale so server truth wins.
                tracing::warn!("create comment returned no entity, reloading thread");
                if let Err(e) = self.load().await {
                    tracing::warn!("thread reload after create failed: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                self.feed.rollback(&temp_id);
                self.draft = submitted;
                if e.is_authorization() {
                    tracing::warn!("comment rejected by server authorization");
                    Err(AppError::StaffOnly)
                } else {
                    tracing::warn!("failed to add comment: {}", e);
                    Err(e)
                }
            }
        }
    }
}
