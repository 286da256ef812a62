//! Team membership actions.

use reqwest::Method;

use super::{EntityCollectionClient, MutationReply, Teams};
use crate::errors::AppError;
use crate::models::EntityId;

impl EntityCollectionClient<Teams> {
    /// Join a team as the signed-in user, then refresh.
    pub async fn join(&self, id: &EntityId) -> Result<MutationReply, AppError> {
        self.membership_action(id, "join").await
    }

    /// Leave a team as the signed-in user, then refresh.
    pub async fn leave(&self, id: &EntityId) -> Result<MutationReply, AppError> {
        self.membership_action(id, "leave").await
    }

    async fn membership_action(&self, id: &EntityId, action: &str) -> Result<MutationReply, AppError> {
        let path = format!("teams/{}/{}", id, action);
        match self.api().send_bodyless(Method::POST, &path).await {
            Ok(reply) => {
                tracing::info!("Team {} {} succeeded", id, action);
                self.list().await;
                Ok(reply)
            }
            Err(e) => {
                tracing::error!("Team {} {} failed: {}", id, action, e);
                Err(e)
            }
        }
    }

    /// Ids of cached teams that list `user_id` as a member.
    pub fn my_team_ids(&self, user_id: &EntityId) -> Vec<EntityId> {
        self.cached()
            .into_iter()
            .filter(|team| team.has_member(user_id))
            .map(|team| team.id)
            .collect()
    }
}
