use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ClientError, SessionUser};

/// Server endpoints the auth store depends on.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    async fn me(&self) -> Result<SessionUser, ClientError>;

    async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError>;

    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError>;

    async fn logout(&self) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// [`AuthApi`] over HTTP. The session cookie set by the server is kept in the
/// client's cookie store and sent back on every request.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: Url,
}

impl HttpAuthApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn read_user(resp: Response, fallback: &str) -> Result<SessionUser, ClientError> {
        let resp = Self::check(resp, fallback).await?;

        Ok(resp.json::<SessionUser>().await?)
    }

    async fn check(resp: Response, fallback: &str) -> Result<Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| fallback.to_owned());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn me(&self) -> Result<SessionUser, ClientError> {
        let resp = self.client.get(self.url("/api/auth/me")?).send().await?;

        Self::read_user(resp, "Failed to load user").await
    }

    async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let resp = self
            .client
            .post(self.url("/api/auth/login")?)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        Self::read_user(resp, "Failed to login").await
    }

    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let resp = self
            .client
            .post(self.url("/api/auth/register")?)
            .json(&RegisterRequest {
                email,
                username,
                password,
            })
            .send()
            .await?;

        Self::read_user(resp, "Failed to register").await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.url("/api/auth/logout")?)
            .send()
            .await?;

        Self::check(resp, "Failed to logout").await?;

        Ok(())
    }
}
