use axum::{
    Router,
    http::{Method, StatusCode},
    routing::get,
};
use peerstake::error::{AppError, expose_error_detail};
use serde_json::json;
use tower::ServiceExt;

mod helpers;

use helpers::{json, request};

#[tokio::test]
async fn test_health_and_ready() -> anyhow::Result<()> {
    let app = helpers::setup("development").await?;

    let resp = app.send(request(Method::GET, "/api/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json(resp).await,
        json!({"status": "ok", "message": "Server is running"})
    );

    let resp = app.send(request(Method::GET, "/api/ready", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await["status"], "ready");

    app.state.pool.close().await;
    let resp = app.send(request(Method::GET, "/api/ready", None)).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
async fn test_unknown_route() -> anyhow::Result<()> {
    let app = helpers::setup("development").await?;

    let resp = app.send(request(Method::GET, "/api/nothing", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json(resp).await,
        json!({"message": "Route not found", "path": "/api/nothing"})
    );

    Ok(())
}

async fn broken() -> Result<(), AppError> {
    Err(AppError::internal("Server error", "disk on fire"))
}

#[tokio::test]
async fn test_error_detail_outside_production() -> anyhow::Result<()> {
    for (environment, expected) in [
        ("development", json!({"message": "Server error", "error": "disk on fire"})),
        ("production", json!({"message": "Server error"})),
    ] {
        let app = helpers::setup(environment).await?;
        let router = Router::new()
            .route("/broken", get(broken))
            .layer(axum::middleware::map_response_with_state(
                app.state.clone(),
                expose_error_detail,
            ))
            .with_state(app.state.clone());

        let resp = router.oneshot(request(Method::GET, "/broken", None)).await?;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(resp).await, expected);
    }

    Ok(())
}
