use crate::repository;

impl super::Command {
    #[tracing::instrument(skip(self))]
    pub async fn leave(&self, user_id: &str, group_id: &str) -> peerstake_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        let Some(group) = repository::find(&mut *tx, group_id.to_owned()).await? else {
            peerstake_shared::not_found!("Peer group not found");
        };

        if !repository::is_member(&mut *tx, group.id.to_owned(), user_id.to_owned()).await? {
            peerstake_shared::user!("You are not a member of this group");
        }

        if group.creator_id == user_id {
            peerstake_shared::user!("Creators cannot leave their groups. Delete the group instead.");
        }

        repository::remove_member(&mut *tx, group.id.to_owned(), user_id.to_owned()).await?;
        repository::touch(&mut *tx, group.id.to_owned()).await?;

        tx.commit().await?;

        tracing::info!("left peer group");

        Ok(())
    }
}
