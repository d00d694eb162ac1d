use peerstake_user::ProviderProfile;
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use url::Url;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_URL: &str = "https://api.github.com";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to identity provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("code exchange rejected: {0}")]
    Exchange(String),
}

/// External OAuth identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start the flow.
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<Url, ProviderError>;

    /// Exchange an authorization code for the user's profile.
    async fn fetch_profile(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderProfile, ProviderError>;
}

pub struct GithubProvider {
    client: Client,
    client_id: String,
    client_secret: String,
}

impl GithubProvider {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("peerstake/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// Primary verified address, else any verified one.
fn pick_email(emails: Vec<GithubEmail>) -> Option<String> {
    let mut verified = emails.into_iter().filter(|e| e.verified).collect::<Vec<_>>();
    let index = verified.iter().position(|e| e.primary).unwrap_or(0);

    (!verified.is_empty()).then(|| verified.swap_remove(index).email)
}

#[async_trait::async_trait]
impl IdentityProvider for GithubProvider {
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<Url, ProviderError> {
        Ok(Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", "user:email"),
                ("state", state),
            ],
        )?)
    }

    #[tracing::instrument(skip_all)]
    async fn fetch_profile(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderProfile, ProviderError> {
        let token = self
            .client
            .post(ACCESS_TOKEN_URL)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        let Some(access_token) = token.access_token else {
            return Err(ProviderError::Exchange(
                token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| "missing access token".to_owned()),
            ));
        };

        let user = self
            .client
            .get(format!("{API_URL}/user"))
            .bearer_auth(&access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<GithubUser>()
            .await?;

        let email = match user.email.filter(|e| !e.is_empty()) {
            Some(email) => Some(email),
            None => {
                let emails = self
                    .client
                    .get(format!("{API_URL}/user/emails"))
                    .bearer_auth(&access_token)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Vec<GithubEmail>>()
                    .await?;

                pick_email(emails)
            }
        };

        tracing::debug!(github_id = user.id, "github profile fetched");

        Ok(ProviderProfile {
            id: user.id.to_string(),
            username: user.login,
            display_name: user.name,
            email,
            avatar: user.avatar_url,
        })
    }
}
