use axum::http::{Method, StatusCode};
use serde_json::json;

mod helpers;

use helpers::{json, json_request, request};

fn goal(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Solve one problem every day",
        "deadline": "2030-01-01T00:00:00Z",
        "stakeAmount": 25.5,
    })
}

#[tokio::test]
async fn test_goal_lifecycle() -> anyhow::Result<()> {
    let app = helpers::setup("development").await?;
    let john = app.register("john").await;

    let resp = app
        .send(json_request(Method::POST, "/api/goals", Some(&john), goal("  Daily leetcode ")))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json(resp).await;
    assert_eq!(created["title"], "Daily leetcode");
    assert_eq!(created["status"], "active");
    assert_eq!(created["stakeAmount"], 25.5);
    assert_eq!(created["deadline"], "2030-01-01T00:00:00Z");
    assert!(created["peerGroup"].is_null());
    let id = created["id"].as_str().unwrap().to_owned();

    let resp = app
        .send(request(Method::GET, &format!("/api/goals/{id}"), Some(&john)))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .send(json_request(
            Method::PUT,
            &format!("/api/goals/{id}"),
            Some(&john),
            json!({"status": "completed"}),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await["status"], "completed");

    let resp = app
        .send(json_request(
            Method::PUT,
            &format!("/api/goals/{id}"),
            Some(&john),
            json!({"title": "Renamed"}),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json(resp).await["message"],
        "Cannot update a completed or failed goal"
    );

    let resp = app
        .send(request(Method::DELETE, &format!("/api/goals/{id}"), Some(&john)))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json(resp).await["message"],
        "Goal not found or cannot be deleted"
    );

    Ok(())
}

#[tokio::test]
async fn test_goals_are_owner_scoped() -> anyhow::Result<()> {
    let app = helpers::setup("development").await?;
    let john = app.register("john").await;
    let jane = app.register("jane").await;

    let resp = app
        .send(json_request(Method::POST, "/api/goals", Some(&john), goal("Mine")))
        .await;
    let id = json(resp).await["id"].as_str().unwrap().to_owned();

    let resp = app
        .send(request(Method::GET, &format!("/api/goals/{id}"), Some(&jane)))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(resp).await["message"], "Goal not found");

    let resp = app.send(request(Method::GET, "/api/goals", Some(&jane))).await;
    assert_eq!(json(resp).await, json!([]));

    let resp = app
        .send(request(Method::DELETE, &format!("/api/goals/{id}"), Some(&jane)))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .send(request(Method::DELETE, &format!("/api/goals/{id}"), Some(&john)))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await["message"], "Goal deleted successfully");

    let resp = app.send(request(Method::GET, "/api/goals", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_goal_with_peer_group() -> anyhow::Result<()> {
    let app = helpers::setup("development").await?;
    let john = app.register("john").await;

    let resp = app
        .send(json_request(
            Method::POST,
            "/api/peer-groups",
            Some(&john),
            json!({"name": "Grinders", "description": "Daily grind", "category": "leetcode"}),
        ))
        .await;
    let group_id = json(resp).await["id"].as_str().unwrap().to_owned();

    let mut body = goal("Grouped");
    body["peerGroupId"] = json!(group_id);
    let resp = app
        .send(json_request(Method::POST, "/api/goals", Some(&john), body))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json(resp).await;
    assert_eq!(created["peerGroup"], json!({"id": group_id, "name": "Grinders"}));

    let mut body = goal("Orphan");
    body["peerGroupId"] = json!("01UNKNOWNGROUP");
    let resp = app
        .send(json_request(Method::POST, "/api/goals", Some(&john), body))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(resp).await["message"], "Invalid peer group ID");

    let resp = app.send(request(Method::GET, "/api/goals", Some(&john))).await;
    let goals = json(resp).await;
    assert_eq!(goals.as_array().map(Vec::len), Some(1));
    assert_eq!(goals[0]["peerGroup"]["name"], "Grinders");

    Ok(())
}
