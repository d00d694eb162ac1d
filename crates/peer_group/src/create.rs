use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::{Category, PeerGroup, repository};

fn default_max_members() -> i64 {
    5
}

fn default_is_public() -> bool {
    true
}

#[derive(Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePeerGroupInput {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Group name must be between 1 and 50 characters"
    ))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Group description must be between 1 and 500 characters"
    ))]
    pub description: String,
    #[validate(range(
        min = 2,
        max = 20,
        message = "A group must have between 2 and 20 members"
    ))]
    #[serde(default = "default_max_members")]
    pub max_members: i64,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    pub category: Category,
}

impl super::Command {
    /// Create a group with `user_id` as its creator and first member.
    #[tracing::instrument(skip(self, input))]
    pub async fn create(
        &self,
        user_id: &str,
        input: CreatePeerGroupInput,
    ) -> peerstake_shared::Result<PeerGroup> {
        let input = CreatePeerGroupInput {
            name: input.name.trim().to_owned(),
            description: input.description.trim().to_owned(),
            ..input
        };
        input.validate()?;

        let id = Ulid::new().to_string();
        let mut tx = self.write_db.begin().await?;

        repository::create(
            &mut *tx,
            repository::CreateInput {
                id: id.to_owned(),
                creator_id: user_id.to_owned(),
                name: input.name,
                description: input.description,
                max_members: input.max_members,
                is_public: input.is_public,
                category: input.category,
            },
        )
        .await?;
        repository::add_member(&mut *tx, id.to_owned(), user_id.to_owned()).await?;

        tx.commit().await?;

        tracing::info!(group_id = %id, "peer group created");

        self.load(&id).await
    }
}
