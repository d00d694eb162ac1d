mod federate;
mod login;
mod password;
mod profile;
mod register;
pub(crate) mod repository;

use std::ops::Deref;

use serde::Serialize;
use time::OffsetDateTime;

pub use federate::ProviderProfile;
pub use login::LoginInput;
pub use password::{hash_password, verify_password};
pub use profile::UpdateProfileInput;
pub use register::RegisterInput;

#[derive(Clone)]
pub struct Command(pub peerstake_shared::State);

impl Deref for Command {
    type Target = peerstake_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub async fn find(&self, id: impl Into<String>) -> peerstake_shared::Result<Option<User>> {
        repository::find(&self.read_db, repository::FindType::Id(id.into()))
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn find_by_email(
        &self,
        email: impl Into<String>,
    ) -> peerstake_shared::Result<Option<User>> {
        let email = email.into().trim().to_lowercase();

        repository::find(&self.read_db, repository::FindType::Email(email))
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn find_by_github_id(
        &self,
        github_id: impl Into<String>,
    ) -> peerstake_shared::Result<Option<User>> {
        repository::find(
            &self.read_db,
            repository::FindType::GithubId(github_id.into()),
        )
        .await?
        .map(User::try_from)
        .transpose()
    }
}

/// A user as exposed to the rest of the system. The password hash never
/// leaves the repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub github_id: Option<String>,
    pub has_password: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Name shown to other people: display name, falling back to username.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.to_owned(),
            email: self.email.to_owned(),
            username: self.username.to_owned(),
            display_name: self.display_name.to_owned(),
            avatar: self.avatar.to_owned(),
        }
    }
}

impl TryFrom<repository::UserRow> for User {
    type Error = peerstake_shared::Error;

    fn try_from(row: repository::UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            has_password: row.password.is_some(),
            id: row.id,
            email: row.email,
            username: row.username,
            display_name: row.display_name,
            avatar: row.avatar,
            github_id: row.github_id,
            created_at: peerstake_shared::from_timestamp(row.created_at)?,
            updated_at: peerstake_shared::from_timestamp(row.updated_at)?,
        })
    }
}

/// Body returned by register, login and profile updates.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}
