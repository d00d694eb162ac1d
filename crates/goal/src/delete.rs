use crate::repository;

impl super::Command {
    /// Only active goals can be deleted, and only by their owner.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, goal_id: &str) -> peerstake_shared::Result<()> {
        let deleted =
            repository::delete_active(&self.write_db, user_id.to_owned(), goal_id.to_owned())
                .await?;

        if !deleted {
            peerstake_shared::not_found!("Goal not found or cannot be deleted");
        }

        tracing::info!(goal_id, "goal deleted");

        Ok(())
    }
}
