use validator::Validate;

use crate::{User, repository};

#[derive(Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub password: String,
}

impl super::Command {
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, input: LoginInput) -> peerstake_shared::Result<User> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        let Some(row) = repository::find(&self.read_db, repository::FindType::Email(email)).await?
        else {
            peerstake_shared::unauthorized!("Invalid credentials");
        };

        // Accounts created through GitHub have no local password.
        let Some(hash) = row.password.as_deref() else {
            peerstake_shared::unauthorized!("Invalid credentials");
        };

        if !crate::verify_password(&input.password, hash)? {
            peerstake_shared::unauthorized!("Invalid credentials");
        }

        tracing::info!(user_id = %row.id, "user logged in");

        User::try_from(row)
    }
}
