mod create;
mod delete;
pub(crate) mod repository;
mod update;

use std::{collections::HashMap, ops::Deref};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::OffsetDateTime;

pub use create::CreateGoalInput;
pub use update::UpdateGoalInput;

#[derive(
    EnumString,
    Display,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Failed,
}

/// Peer group attached to a goal, reduced to what goal listings show.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PeerGroupRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub peer_group: Option<PeerGroupRef>,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub deadline: OffsetDateTime,
    pub stake_amount: f64,
    pub status: GoalStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Goal {
    fn from_row(
        row: repository::GoalRow,
        names: &HashMap<String, String>,
    ) -> peerstake_shared::Result<Self> {
        let peer_group = row.peer_group_id.and_then(|id| {
            names
                .get(&id)
                .map(|name| PeerGroupRef {
                    id: id.to_owned(),
                    name: name.to_owned(),
                })
        });

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            peer_group,
            title: row.title,
            description: row.description,
            deadline: peerstake_shared::from_timestamp(row.deadline)?,
            stake_amount: row.stake_amount,
            status: row.status.0,
            created_at: peerstake_shared::from_timestamp(row.created_at)?,
            updated_at: peerstake_shared::from_timestamp(row.updated_at)?,
        })
    }
}

#[derive(Clone)]
pub struct Command(pub peerstake_shared::State);

impl Deref for Command {
    type Target = peerstake_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    /// Goals owned by `user_id`, newest first.
    pub async fn list(&self, user_id: impl Into<String>) -> peerstake_shared::Result<Vec<Goal>> {
        let rows = repository::list(&self.read_db, user_id.into()).await?;
        let names = repository::peer_group_names(
            &self.read_db,
            rows.iter().filter_map(|row| row.peer_group_id.to_owned()),
        )
        .await?;

        rows.into_iter()
            .map(|row| Goal::from_row(row, &names))
            .collect()
    }

    /// A goal owned by `user_id`. Goals of other users are reported as
    /// missing.
    pub async fn find(
        &self,
        user_id: impl Into<String>,
        goal_id: impl Into<String>,
    ) -> peerstake_shared::Result<Goal> {
        let Some(row) = repository::find(&self.read_db, user_id.into(), goal_id.into()).await?
        else {
            peerstake_shared::not_found!("Goal not found");
        };

        let names =
            repository::peer_group_names(&self.read_db, row.peer_group_id.to_owned()).await?;

        Goal::from_row(row, &names)
    }
}
