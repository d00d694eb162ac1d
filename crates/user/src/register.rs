use ulid::Ulid;
use validator::Validate;

use crate::{User, repository};

#[derive(Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 30,
        message = "Username must be between 1 and 30 characters"
    ))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl super::Command {
    #[tracing::instrument(skip_all, fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> peerstake_shared::Result<User> {
        let input = RegisterInput {
            email: input.email.trim().to_lowercase(),
            username: input.username.trim().to_owned(),
            password: input.password,
        };
        input.validate()?;

        if repository::exists_with_email_or_username(
            &self.read_db,
            input.email.to_owned(),
            input.username.to_owned(),
        )
        .await?
        {
            peerstake_shared::user!("User already exists");
        }

        let password_hash = crate::hash_password(&input.password)?;
        let id = Ulid::new().to_string();

        let created = repository::create(
            &self.write_db,
            repository::CreateInput {
                id: id.to_owned(),
                email: input.email,
                display_name: Some(input.username.to_owned()),
                username: input.username,
                password: Some(password_hash),
                avatar: None,
                github_id: None,
            },
        )
        .await;

        match created {
            Ok(()) => {}
            Err(err) if err.is_unique_violation() => {
                peerstake_shared::user!("User already exists");
            }
            Err(err) => return Err(err),
        }

        tracing::info!(user_id = %id, "user registered");

        let Some(user) = self.find(&id).await? else {
            peerstake_shared::bail!("user {id} missing after register");
        };

        Ok(user)
    }
}
