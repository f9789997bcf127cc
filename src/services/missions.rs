use std::sync::Arc;

use validator::Validate;

use crate::errors::Result;
use crate::models::feed::{CreateMission, Mission};
use crate::models::user::CurrentUser;
use crate::services::api::ElevateApi;
use crate::services::feed::OptimisticFeed;

/// The student's mission board. Creating a mission follows the same
/// optimistic insert / confirm / rollback cycle as the comment thread; there
/// is no role gate because every signed-in user owns their missions.
pub struct MissionBoard {
    api: Arc<dyn ElevateApi>,
    user: CurrentUser,
    feed: OptimisticFeed<Mission>,
    in_flight: bool,
}

impl MissionBoard {
    pub fn new(api: Arc<dyn ElevateApi>, user: CurrentUser) -> Self {
        Self {
            api,
            user,
            feed: OptimisticFeed::new(),
            in_flight: false,
        }
    }

    pub fn missions(&self) -> &[Mission] {
        self.feed.items()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub async fn load(&mut self) -> Result<()> {
        let missions = self.api.list_missions().await?;
        self.feed.replace_all(missions);
        Ok(())
    }

    pub async fn submit(&mut self, title: &str, description: Option<String>) -> Result<()> {
        let title = title.trim().to_string();

        let request = CreateMission {
            title: title.clone(),
            description,
        };
        request.validate()?;

        let temp_id = self
            .feed
            .insert_provisional(Mission::provisional(&title, &self.user));

        self.in_flight = true;
        let outcome = self.api.create_mission(&request).await;
        self.in_flight = false;

        match outcome {
            Ok(Some(mission)) => {
                self.feed.confirm(&temp_id, mission);
                Ok(())
            }
            Ok(None) => {
                tracing::warn!("create mission returned no entity, reloading board");
                if let Err(e) = self.load().await {
                    tracing::warn!("mission reload after create failed: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                self.feed.rollback(&temp_id);
                tracing::warn!("failed to create mission: {}", e);
                Err(e)
            }
        }
    }
}
