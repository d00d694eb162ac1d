use ulid::Ulid;

use crate::{User, repository};

/// Identity returned by an external provider after a successful OAuth
/// exchange.
#[derive(Debug, Clone, Default)]
pub struct ProviderProfile {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl ProviderProfile {
    fn email_or_placeholder(&self) -> String {
        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => email.to_lowercase(),
            _ => format!("{}+{}@users.noreply.github.com", self.id, self.username).to_lowercase(),
        }
    }
}

impl super::Command {
    /// Resolve a provider identity to a local user, creating the user on the
    /// first login. Repeated calls with the same provider id return the same
    /// user.
    #[tracing::instrument(skip_all, fields(github_id = %profile.id))]
    pub async fn federate(&self, profile: ProviderProfile) -> peerstake_shared::Result<User> {
        let github_id = profile.id.trim().to_owned();
        if github_id.is_empty() {
            peerstake_shared::user!("Provider profile has no identifier");
        }

        if let Some(user) = self.find_by_github_id(&github_id).await? {
            return Ok(user);
        }

        let email = profile.email_or_placeholder();
        if self.find_by_email(&email).await?.is_some() {
            peerstake_shared::user!("An account with this email already exists");
        }

        let login = match profile.username.trim() {
            "" => format!("github-{github_id}"),
            login => login.to_owned(),
        };
        let username = if repository::is_username_exists(&self.read_db, login.to_owned()).await? {
            format!("{login}-{github_id}")
        } else {
            login.to_owned()
        };

        let display_name = profile
            .display_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or(login);

        let id = Ulid::new().to_string();
        let created = repository::create(
            &self.write_db,
            repository::CreateInput {
                id: id.to_owned(),
                email,
                username,
                password: None,
                display_name: Some(display_name),
                avatar: profile.avatar,
                github_id: Some(github_id.to_owned()),
            },
        )
        .await;

        match created {
            Ok(()) => {
                tracing::info!(user_id = %id, "user created from github profile");
            }
            // A concurrent callback for the same provider id won the insert.
            Err(err) if err.is_unique_violation() => {
                if let Some(user) = self.find_by_github_id(&github_id).await? {
                    return Ok(user);
                }

                return Err(err);
            }
            Err(err) => return Err(err),
        }

        let Some(user) = self.find(&id).await? else {
            peerstake_shared::bail!("user {id} missing after federate");
        };

        Ok(user)
    }
}
