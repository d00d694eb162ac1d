mod create;
mod join;
mod leave;
pub(crate) mod repository;

use std::{collections::HashMap, ops::Deref};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::OffsetDateTime;

pub use create::CreatePeerGroupInput;

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
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
pub enum Category {
    Leetcode,
    Project,
    Learning,
    #[default]
    Other,
}

/// Public fields of a user shown inside a group.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator: Option<MemberSummary>,
    /// Absent from public listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberSummary>>,
    pub member_count: i64,
    pub max_members: i64,
    pub is_public: bool,
    pub category: Category,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PeerGroup {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members
            .as_ref()
            .is_some_and(|members| members.iter().any(|m| m.id == user_id))
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
    /// Public groups, newest first, optionally narrowed to one category.
    /// Member lists are never included.
    pub async fn list_public(
        &self,
        category: Option<Category>,
    ) -> peerstake_shared::Result<Vec<PeerGroup>> {
        let rows = repository::list_public(&self.read_db, category).await?;

        self.populate(rows, false).await
    }

    /// Groups `user_id` belongs to, with creator and members populated.
    pub async fn list_for_member(
        &self,
        user_id: impl Into<String>,
    ) -> peerstake_shared::Result<Vec<PeerGroup>> {
        let rows = repository::list_for_member(&self.read_db, user_id.into()).await?;

        self.populate(rows, true).await
    }

    pub async fn find(&self, user_id: &str, group_id: &str) -> peerstake_shared::Result<PeerGroup> {
        let group = self.load(group_id).await?;

        if !group.is_public && !group.is_member(user_id) {
            peerstake_shared::forbidden!("Not authorized to view this group");
        }

        Ok(group)
    }

    pub(crate) async fn load(&self, group_id: &str) -> peerstake_shared::Result<PeerGroup> {
        let Some(row) = repository::find(&self.read_db, group_id.to_owned()).await? else {
            peerstake_shared::not_found!("Peer group not found");
        };

        let Some(group) = self.populate(vec![row], true).await?.pop() else {
            peerstake_shared::not_found!("Peer group not found");
        };

        Ok(group)
    }

    async fn populate(
        &self,
        rows: Vec<repository::PeerGroupRow>,
        with_members: bool,
    ) -> peerstake_shared::Result<Vec<PeerGroup>> {
        let ids = rows.iter().map(|row| row.id.to_owned()).collect::<Vec<_>>();
        let creators = repository::users(
            &self.read_db,
            rows.iter().map(|row| row.creator_id.to_owned()),
        )
        .await?;
        let counts = repository::member_counts(&self.read_db, ids.to_owned()).await?;

        let mut members: HashMap<String, Vec<MemberSummary>> = HashMap::new();
        if with_members {
            for row in repository::members(&self.read_db, ids).await? {
                members
                    .entry(row.peer_group_id.to_owned())
                    .or_default()
                    .push(row.into());
            }
        }

        rows.into_iter()
            .map(|row| {
                Ok(PeerGroup {
                    creator: creators.get(&row.creator_id).cloned(),
                    members: with_members
                        .then(|| members.remove(&row.id).unwrap_or_default()),
                    member_count: counts.get(&row.id).copied().unwrap_or_default(),
                    max_members: row.max_members,
                    is_public: row.is_public,
                    category: row.category.0,
                    created_at: peerstake_shared::from_timestamp(row.created_at)?,
                    updated_at: peerstake_shared::from_timestamp(row.updated_at)?,
                    id: row.id,
                    name: row.name,
                    description: row.description,
                })
            })
            .collect()
    }
}
