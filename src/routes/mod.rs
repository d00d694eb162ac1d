use std::sync::Arc;

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware::map_response_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

use crate::{
    config::Config,
    error::expose_error_detail,
    github::{GithubProvider, IdentityProvider},
};

pub mod auth;
pub mod github;
pub mod goals;
pub mod health;
pub mod peer_groups;
pub mod user;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub user_command: peerstake_user::Command,
    pub goal_command: peerstake_goal::Command,
    pub peer_group_command: peerstake_peer_group::Command,
    /// `None` when GitHub credentials are not configured.
    pub identity_provider: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    pub fn new(config: Config, state: peerstake_shared::State) -> anyhow::Result<Self> {
        let identity_provider = match config.github.credentials() {
            Some((id, secret)) => {
                Some(Arc::new(GithubProvider::new(id, secret)?) as Arc<dyn IdentityProvider>)
            }
            None => {
                tracing::warn!("GitHub OAuth credentials missing, GitHub login disabled");
                None
            }
        };

        Ok(Self {
            config,
            pool: state.read_db.clone(),
            user_command: peerstake_user::Command(state.clone()),
            goal_command: peerstake_goal::Command(state.clone()),
            peer_group_command: peerstake_peer_group::Command(state),
            identity_provider,
        })
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }
}

pub async fn fallback(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Route not found",
            "path": uri.path(),
        })),
    )
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/github", get(github::start))
        .route("/auth/github/callback", get(github::callback))
        .route(
            "/user/profile",
            get(user::profile).put(user::update_profile),
        )
        .route("/user/directory", post(user::create_directory))
        .route("/goals", get(goals::list).post(goals::create))
        .route(
            "/goals/{goal_id}",
            get(goals::find).put(goals::update).delete(goals::delete),
        )
        .route("/peer-groups/public", get(peer_groups::list_public))
        .route(
            "/peer-groups",
            get(peer_groups::list_mine).post(peer_groups::create),
        )
        .route("/peer-groups/{group_id}", get(peer_groups::find))
        .route("/peer-groups/{group_id}/join", post(peer_groups::join))
        .route("/peer-groups/{group_id}/leave", post(peer_groups::leave));

    let index = ServeDir::new(&state.config.server.index_dir);

    Router::new()
        .nest("/api", api)
        .nest_service("/index", index)
        .fallback(fallback)
        .layer(map_response_with_state(state.clone(), expose_error_detail))
        .with_state(state)
}
