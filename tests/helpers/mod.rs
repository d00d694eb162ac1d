#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use http_body_util::BodyExt;
use peerstake::{
    AppState, Config,
    config::{DatabaseConfig, GithubConfig, JwtConfig, ObservabilityConfig, ServerConfig},
    github::IdentityProvider,
};
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub router: Router,
}

pub fn test_config(dir: &TempDir, environment: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 5000,
            environment: environment.to_owned(),
            client_url: "http://localhost:5173".to_owned(),
            public_url: "http://localhost:5000".to_owned(),
            index_dir: dir.child("index").display().to_string(),
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("db.sqlite3").display()),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: SECRET.to_owned(),
            expiration_days: 30,
        },
        github: GithubConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup(environment: &str) -> anyhow::Result<TestApp> {
    setup_with(environment, None).await
}

pub async fn setup_with(
    environment: &str,
    provider: Option<Arc<dyn IdentityProvider>>,
) -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let config = test_config(&dir, environment);

    let pool = peerstake::create_pool(&config.database.url, 5).await?;
    peerstake::migrate(&pool).await?;
    tokio::fs::create_dir_all(&config.server.index_dir).await?;

    let mut state = AppState::new(config, peerstake_shared::State::single(pool))?;
    if let Some(provider) = provider {
        state = state.with_identity_provider(provider);
    }

    let router = peerstake::router(state.clone());

    Ok(TestApp { dir, state, router })
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }

    /// Register a user and return the session cookie pair (`token=...`).
    pub async fn register(&self, name: &str) -> String {
        let resp = self
            .send(json_request(
                Method::POST,
                "/api/auth/register",
                None,
                serde_json::json!({
                    "email": format!("{name}@peerstake.localhost"),
                    "username": name,
                    "password": "my_password",
                }),
            ))
            .await;
        assert_eq!(resp.status(), 201, "register {name}");

        session(&resp).expect("session cookie")
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn json(resp: Response<Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Raw `Set-Cookie` header for `name`.
pub fn set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{name}=")))
        .map(ToOwned::to_owned)
}

/// `token=...` pair suitable for a `Cookie` request header.
pub fn session(resp: &Response<Body>) -> Option<String> {
    set_cookie(resp, "token")
        .and_then(|value| value.split(';').next().map(ToOwned::to_owned))
        .filter(|pair| pair != "token=")
}
