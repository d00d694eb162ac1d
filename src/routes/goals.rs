use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use peerstake_goal::{CreateGoalInput, Goal, UpdateGoalInput};
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiJson, AppError},
};

/// GET /api/goals
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Goal>>, AppError> {
    Ok(Json(state.goal_command.list(&user.id).await?))
}

/// POST /api/goals
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(input): ApiJson<CreateGoalInput>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let goal = state.goal_command.create(&user.id, input).await?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/goals/{goal_id}
pub async fn find(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(goal_id): Path<String>,
) -> Result<Json<Goal>, AppError> {
    Ok(Json(state.goal_command.find(&user.id, goal_id).await?))
}

/// PUT /api/goals/{goal_id}
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(goal_id): Path<String>,
    ApiJson(input): ApiJson<UpdateGoalInput>,
) -> Result<Json<Goal>, AppError> {
    Ok(Json(
        state.goal_command.update(&user.id, &goal_id, input).await?,
    ))
}

/// DELETE /api/goals/{goal_id}
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(goal_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.goal_command.delete(&user.id, &goal_id).await?;

    Ok(Json(json!({"message": "Goal deleted successfully"})))
}
