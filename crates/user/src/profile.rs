use validator::Validate;

use crate::{User, repository};

#[derive(Validate, Default)]
pub struct UpdateProfileInput {
    #[validate(length(
        min = 1,
        max = 30,
        message = "Username must be between 1 and 30 characters"
    ))]
    pub username: Option<String>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Display name must be between 1 and 100 characters"
    ))]
    pub display_name: Option<String>,
}

impl super::Command {
    #[tracing::instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        id: &str,
        input: UpdateProfileInput,
    ) -> peerstake_shared::Result<User> {
        let input = UpdateProfileInput {
            username: input
                .username
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty()),
            display_name: input
                .display_name
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty()),
        };
        input.validate()?;

        let Some(user) = self.find(id).await? else {
            peerstake_shared::not_found!("User not found");
        };

        let username = match input.username {
            Some(username) if username != user.username => {
                if repository::is_username_exists(&self.read_db, username.to_owned()).await? {
                    peerstake_shared::user!("Username already taken");
                }

                Some(username)
            }
            _ => None,
        };

        let updated = repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: user.id.to_owned(),
                username,
                display_name: input.display_name,
            },
        )
        .await;

        match updated {
            Ok(()) => {}
            Err(err) if err.is_unique_violation() => {
                peerstake_shared::user!("Username already taken");
            }
            Err(err) => return Err(err),
        }

        let Some(user) = self.find(id).await? else {
            peerstake_shared::not_found!("User not found");
        };

        Ok(user)
    }
}
