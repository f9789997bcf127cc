use std::sync::Arc;

use validator::Validate;

use crate::errors::Result;
use crate::models::feed::{CreateReflection, Reflection};
use crate::models::user::CurrentUser;
use crate::services::api::ElevateApi;
use crate::services::feed::OptimisticFeed;

/// The student's reflection journal, newest first, same optimistic cycle as
/// the mission board.
pub struct ReflectionJournal {
    api: Arc<dyn ElevateApi>,
    user: CurrentUser,
    feed: OptimisticFeed<Reflection>,
    in_flight: bool,
}

impl ReflectionJournal {
    pub fn new(api: Arc<dyn ElevateApi>, user: CurrentUser) -> Self {
        Self {
            api,
            user,
            feed: OptimisticFeed::new(),
            in_flight: false,
        }
    }

    pub fn reflections(&self) -> &[Reflection] {
        self.feed.items()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub async fn load(&mut self) -> Result<()> {
        let reflections = self.api.list_reflections().await?;
        self.feed.replace_all(reflections);
        Ok(())
    }

    pub async fn submit(&mut self, content: &str) -> Result<()> {
        let content = content.trim().to_string();

        let request = CreateReflection {
            content: content.clone(),
        };
        request.validate()?;

        let temp_id = self
            .feed
            .insert_provisional(Reflection::provisional(&content, &self.user));

        self.in_flight = true;
        let outcome = self.api.create_reflection(&request).await;
        self.in_flight = false;

        match outcome {
            Ok(Some(reflection)) => {
                self.feed.confirm(&temp_id, reflection);
                Ok(())
            }
            Ok(None) => {
                tracing::warn!("create reflection returned no entity, reloading journal");
                if let Err(e) = self.load().await {
                    tracing::warn!("journal reload after create failed: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                self.feed.rollback(&temp_id);
                tracing::warn!("failed to create reflection: {}", e);
                Err(e)
            }
        }
    }
}
