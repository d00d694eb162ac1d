use serde::Deserialize;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use crate::{Goal, repository};

#[derive(Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Goal title must be between 1 and 100 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Goal description must be between 1 and 500 characters"
    ))]
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub deadline: OffsetDateTime,
    #[validate(range(min = 0.0, message = "Stake amount cannot be negative"))]
    pub stake_amount: f64,
    #[serde(default)]
    pub peer_group_id: Option<String>,
}

impl super::Command {
    #[tracing::instrument(skip(self, input))]
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateGoalInput,
    ) -> peerstake_shared::Result<Goal> {
        let input = CreateGoalInput {
            title: input.title.trim().to_owned(),
            description: input.description.trim().to_owned(),
            peer_group_id: input
                .peer_group_id
                .map(|id| id.trim().to_owned())
                .filter(|id| !id.is_empty()),
            ..input
        };
        input.validate()?;

        if let Some(peer_group_id) = &input.peer_group_id {
            if !repository::peer_group_exists(&self.read_db, peer_group_id.to_owned()).await? {
                peerstake_shared::user!("Invalid peer group ID");
            }
        }

        let id = Ulid::new().to_string();
        repository::create(
            &self.write_db,
            repository::CreateInput {
                id: id.to_owned(),
                user_id: user_id.to_owned(),
                peer_group_id: input.peer_group_id,
                title: input.title,
                description: input.description,
                deadline: input.deadline.unix_timestamp(),
                stake_amount: input.stake_amount,
            },
        )
        .await?;

        tracing::info!(goal_id = %id, "goal created");

        self.find(user_id, id).await
    }
}
