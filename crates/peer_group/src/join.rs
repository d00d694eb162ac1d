use crate::{PeerGroup, repository};

impl super::Command {
    /// Add `user_id` to a public group that still has room. The checks and
    /// the insert share one transaction.
    #[tracing::instrument(skip(self))]
    pub async fn join(&self, user_id: &str, group_id: &str) -> peerstake_shared::Result<PeerGroup> {
        let mut tx = self.write_db.begin().await?;

        let Some(group) = repository::find(&mut *tx, group_id.to_owned()).await? else {
            peerstake_shared::not_found!("Peer group not found");
        };

        if !group.is_public {
            peerstake_shared::forbidden!("Cannot join a private group");
        }

        let count = repository::member_count(&mut *tx, group.id.to_owned()).await?;
        if count >= group.max_members {
            peerstake_shared::user!("Group is full");
        }

        if repository::is_member(&mut *tx, group.id.to_owned(), user_id.to_owned()).await? {
            peerstake_shared::user!("You are already a member of this group");
        }

        repository::add_member(&mut *tx, group.id.to_owned(), user_id.to_owned()).await?;
        repository::touch(&mut *tx, group.id.to_owned()).await?;

        tx.commit().await?;

        tracing::info!("joined peer group");

        self.load(&group.id).await
    }
}
