use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use peerstake_user::{LoginInput, RegisterInput, User, UserSummary};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    auth::{AuthUser, clear_session_cookie, session_cookie},
    error::{ApiJson, AppError},
};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserSummary>), AppError> {
    let user = state
        .user_command
        .register(RegisterInput {
            email: req.email,
            username: req.username,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie(&state.config, &user.id)?;

    Ok((StatusCode::CREATED, jar.add(cookie), Json(user.summary())))
}

/// POST /api/auth/login
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserSummary>), AppError> {
    let user = state
        .user_command
        .login(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie(&state.config, &user.id)?;

    Ok((jar.add(cookie), Json(user.summary())))
}

/// POST /api/auth/logout - always succeeds
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(clear_session_cookie(&state.config)),
        Json(json!({"message": "Logged out successfully"})),
    )
}

/// GET /api/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
