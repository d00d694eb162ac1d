use std::path::Path;

use axum::{Json, extract::State, http::StatusCode};
use peerstake_user::{UpdateProfileInput, User, UserSummary};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiJson, AppError},
    user_space::{self, Directory},
};

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub display_name: Option<String>,
}

/// GET /api/user/profile
pub async fn profile(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// PUT /api/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserSummary>, AppError> {
    let user = state
        .user_command
        .update_profile(
            &user.id,
            UpdateProfileInput {
                username: req.username,
                display_name: req.display_name,
            },
        )
        .await?;

    Ok(Json(user.summary()))
}

/// POST /api/user/directory
pub async fn create_directory(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let root = Path::new(&state.config.server.index_dir);

    let directory = user_space::ensure(root, &user)
        .await
        .map_err(|err| AppError::internal("Failed to create directory", err))?;

    Ok(match directory {
        Directory::Created(path) => (
            StatusCode::CREATED,
            Json(json!({"message": "Directory created successfully", "path": path})),
        ),
        Directory::Exists(path) => (
            StatusCode::OK,
            Json(json!({"message": "Directory already exists", "path": path})),
        ),
    })
}
