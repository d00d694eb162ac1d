use serde::Deserialize;
use time::OffsetDateTime;
use validator::Validate;

use crate::{Goal, GoalStatus, repository};

#[derive(Validate, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Goal title must be between 1 and 100 characters"
    ))]
    #[serde(default)]
    pub title: Option<String>,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Goal description must be between 1 and 500 characters"
    ))]
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deadline: Option<OffsetDateTime>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
}

impl super::Command {
    /// Edit a goal. A closed goal only accepts a request that settles it as
    /// completed or failed.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        user_id: &str,
        goal_id: &str,
        input: UpdateGoalInput,
    ) -> peerstake_shared::Result<Goal> {
        let input = UpdateGoalInput {
            title: input
                .title
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty()),
            description: input
                .description
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty()),
            ..input
        };
        input.validate()?;

        let Some(goal) =
            repository::find(&self.read_db, user_id.to_owned(), goal_id.to_owned()).await?
        else {
            peerstake_shared::not_found!("Goal not found");
        };

        let settles = matches!(
            input.status,
            Some(GoalStatus::Completed | GoalStatus::Failed)
        );
        if goal.status.0 != GoalStatus::Active && !settles {
            peerstake_shared::user!("Cannot update a completed or failed goal");
        }

        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: goal.id.to_owned(),
                title: input.title,
                description: input.description,
                deadline: input.deadline.map(|d| d.unix_timestamp()),
                status: input.status,
            },
        )
        .await?;

        tracing::info!(goal_id = %goal.id, "goal updated");

        self.find(user_id, goal.id).await
    }
}
