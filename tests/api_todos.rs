mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{TestApp, ALICE_TOKEN};

#[tokio::test]
async fn create_returns_201_with_camel_case_record() {
    let app = TestApp::spawn();

    let (status, todo) = app
        .post(
            "/api/todos",
            ALICE_TOKEN,
            json!({
                "title": "Write weekly report",
                "description": "for Monday standup",
                "priority": "High",
                "dueDate": "2026-09-07"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todo["title"], "Write weekly report");
    assert_eq!(todo["priority"], "High");
    assert_eq!(todo["completed"], false);
    assert_eq!(todo["dueDate"], "2026-09-07");
    assert!(todo["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(todo["createdAt"].is_string());
}

#[tokio::test]
async fn create_without_title_is_a_400() {
    let app = TestApp::spawn();

    let (status, body) = app
        .post("/api/todos", ALICE_TOKEN, json!({ "description": "no title" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please add a title");
}

#[tokio::test]
async fn listing_returns_pagination_envelope() {
    let app = TestApp::spawn();
    for index in 0..7 {
        app.create_todo(ALICE_TOKEN, json!({ "title": format!("task {index}") }))
            .await;
    }

    let (status, page) = app.get("/api/todos?limit=3", ALICE_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 7);
    assert_eq!(page["pages"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["todos"].as_array().map(Vec::len), Some(3));

    let (status, page3) = app.get("/api/todos?limit=3&page=3", ALICE_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page3["page"], 3);
    assert_eq!(page3["todos"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn listing_uses_configured_default_limit() {
    let app = TestApp::spawn_with_limit(2);
    for index in 0..5 {
        app.create_todo(ALICE_TOKEN, json!({ "title": format!("task {index}") }))
            .await;
    }

    let (status, page) = app.get("/api/todos", ALICE_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["todos"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["pages"], 3);
}

#[tokio::test]
async fn filters_compose_across_query_parameters() {
    let app = TestApp::spawn();
    let ship = app
        .create_todo(
            ALICE_TOKEN,
            json!({ "title": "Ship release", "priority": "High" }),
        )
        .await;
    app.create_todo(
        ALICE_TOKEN,
        json!({ "title": "Ship swag boxes", "priority": "Low" }),
    )
    .await;
    app.create_todo(
        ALICE_TOKEN,
        json!({ "title": "Plan offsite", "priority": "High" }),
    )
    .await;

    let (status, page) = app
        .get("/api/todos?search=ship&priority=High", ALICE_TOKEN)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["todos"][0]["id"], ship.as_str());
}

#[tokio::test]
async fn status_filter_tracks_completion() {
    let app = TestApp::spawn();
    let done = app.create_todo(ALICE_TOKEN, json!({ "title": "done" })).await;
    app.create_todo(ALICE_TOKEN, json!({ "title": "open" })).await;

    let (status, updated) = app
        .put(
            &format!("/api/todos/{done}"),
            ALICE_TOKEN,
            json!({ "completed": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);

    let (_, completed) = app.get("/api/todos?status=Completed", ALICE_TOKEN).await;
    assert_eq!(completed["total"], 1);
    assert_eq!(completed["todos"][0]["id"], done.as_str());

    let (_, pending) = app.get("/api/todos?status=Pending", ALICE_TOKEN).await;
    assert_eq!(pending["total"], 1);
}

#[tokio::test]
async fn date_window_is_inclusive_and_skips_undated() {
    let app = TestApp::spawn();
    let dated = app
        .create_todo(
            ALICE_TOKEN,
            json!({ "title": "dated", "dueDate": "2026-09-15" }),
        )
        .await;
    app.create_todo(ALICE_TOKEN, json!({ "title": "undated" })).await;

    let (status, page) = app
        .get(
            "/api/todos?startDate=2026-09-15&endDate=2026-09-15",
            ALICE_TOKEN,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["todos"][0]["id"], dated.as_str());
}

#[tokio::test]
async fn update_and_delete_roundtrip() {
    let app = TestApp::spawn();
    let id = app
        .create_todo(ALICE_TOKEN, json!({ "title": "original" }))
        .await;

    let (status, updated) = app
        .put(
            &format!("/api/todos/{id}"),
            ALICE_TOKEN,
            json!({ "title": "renamed", "priority": "Medium" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "renamed");
    assert_eq!(updated["priority"], "Medium");

    let (status, body) = app.delete(&format!("/api/todos/{id}"), ALICE_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (_, page) = app.get("/api/todos", ALICE_TOKEN).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn unknown_todo_is_a_404() {
    let app = TestApp::spawn();

    let (status, body) = app
        .put(
            "/api/todos/01ARZ3NDEKTSV4RRFFQ69G5FAV",
            ALICE_TOKEN,
            json!({ "title": "ghost" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, _) = app
        .delete("/api/todos/01ARZ3NDEKTSV4RRFFQ69G5FAV", ALICE_TOKEN)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
