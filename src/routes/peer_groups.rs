use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use peerstake_peer_group::{Category, CreatePeerGroupInput, PeerGroup};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiJson, AppError},
};

#[derive(Deserialize, Default)]
pub struct PublicParams {
    pub category: Option<String>,
}

/// GET /api/peer-groups/public
pub async fn list_public(
    State(state): State<AppState>,
    params: Result<Query<PublicParams>, QueryRejection>,
) -> Result<Json<Vec<PeerGroup>>, AppError> {
    let Query(params) = params?;
    let category = match params.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            Category::from_str(value)
                .map_err(|_| AppError::BadRequest("Invalid category".to_owned()))?,
        ),
    };

    Ok(Json(state.peer_group_command.list_public(category).await?))
}

/// GET /api/peer-groups
pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<PeerGroup>>, AppError> {
    Ok(Json(
        state.peer_group_command.list_for_member(&user.id).await?,
    ))
}

/// POST /api/peer-groups
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(input): ApiJson<CreatePeerGroupInput>,
) -> Result<(StatusCode, Json<PeerGroup>), AppError> {
    let group = state.peer_group_command.create(&user.id, input).await?;

    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/peer-groups/{group_id}
pub async fn find(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<String>,
) -> Result<Json<PeerGroup>, AppError> {
    Ok(Json(
        state.peer_group_command.find(&user.id, &group_id).await?,
    ))
}

/// POST /api/peer-groups/{group_id}/join
pub async fn join(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let group = state.peer_group_command.join(&user.id, &group_id).await?;

    Ok(Json(json!({
        "message": "Successfully joined the group",
        "peerGroup": group,
    })))
}

/// POST /api/peer-groups/{group_id}/leave
pub async fn leave(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.peer_group_command.leave(&user.id, &group_id).await?;

    Ok(Json(json!({"message": "Successfully left the group"})))
}
