mod utils;

use axum::http::StatusCode;
use utils::actions::{create_todo, send, signup};
use utils::setup::TestSetup;

#[tokio::test]
async fn created_todo_keeps_title_and_owner() {
    let setup = TestSetup::new();
    let (_, token) = signup(&setup.app, "alice", "alice@example.com").await;

    let (status, body, _) = send(
        &setup.app,
        "POST",
        "/todos",
        Some(&token),
        Some(serde_json::json!({ "title": "Mail", "description": "Send mail" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Mail");
    assert_eq!(body["description"], "Send mail");
    assert_eq!(body["completed"], false);
    assert!(body["completed_at"].is_null());

    // created_by is the caller's id: the same todo comes back on GET /todos
    let (_, list, _) = send(&setup.app, "GET", "/todos", Some(&token), None).await;
    assert_eq!(list["todos"][0]["id"], body["id"]);
    assert_eq!(list["todos"][0]["created_by"], body["created_by"]);
}

#[tokio::test]
async fn empty_payload_is_400_and_store_unchanged() {
    let setup = TestSetup::new();
    let (_, token) = signup(&setup.app, "alice", "alice@example.com").await;

    let (status, body, _) = send(
        &setup.app,
        "POST",
        "/todos",
        Some(&token),
        Some(serde_json::json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to save the todo.");
    assert_eq!(setup.todo_repository.todo_count(), 0);
}

#[tokio::test]
async fn listing_never_shows_foreign_todos() {
    let setup = TestSetup::new();
    let (_, alice) = signup(&setup.app, "alice", "alice@example.com").await;
    let (_, bob) = signup(&setup.app, "bob", "bob@example.com").await;

    create_todo(&setup.app, &alice, "Mail the letter").await;
    let bobs = create_todo(&setup.app, &bob, "Water plants").await;

    let (status, body, _) = send(&setup.app, "GET", "/todos", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["title"], "Mail the letter");

    // Nor can Alice fetch Bob's todo directly
    let (status, body, _) = send(
        &setup.app,
        "GET",
        &format!("/todos/{}", bobs["id"].as_str().unwrap()),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No matching todo found!");
}

#[tokio::test]
async fn patch_completed_true_sets_timestamp() {
    let setup = TestSetup::new();
    let (_, token) = signup(&setup.app, "alice", "alice@example.com").await;
    let todo = create_todo(&setup.app, &token, "Mail the letter").await;
    let id = todo["id"].as_str().unwrap();

    let (status, body, _) = send(
        &setup.app,
        "PATCH",
        &format!("/todos/{}", id),
        Some(&token),
        Some(serde_json::json!({ "completed": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], true);
    assert!(body["completed_at"].is_i64());
}

#[tokio::test]
async fn patch_completed_false_clears_timestamp_despite_client_input() {
    let setup = TestSetup::new();
    let (_, token) = signup(&setup.app, "alice", "alice@example.com").await;
    let todo = create_todo(&setup.app, &token, "Mail the letter").await;
    let id = todo["id"].as_str().unwrap();

    // Complete it first
    send(
        &setup.app,
        "PATCH",
        &format!("/todos/{}", id),
        Some(&token),
        Some(serde_json::json!({ "completed": true })),
    )
    .await;

    // completed=false with a client-supplied completed_at: the timestamp is
    // re-derived, not trusted
    let (status, body, _) = send(
        &setup.app,
        "PATCH",
        &format!("/todos/{}", id),
        Some(&token),
        Some(serde_json::json!({ "completed": false, "completed_at": 1234567890 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], false);
    assert!(body["completed_at"].is_null());
}

#[tokio::test]
async fn malformed_id_is_invalid_id_on_every_verb() {
    let setup = TestSetup::new();
    let (_, token) = signup(&setup.app, "alice", "alice@example.com").await;

    for method in ["GET", "PATCH", "DELETE"] {
        let body = (method == "PATCH").then(|| serde_json::json!({ "completed": true }));
        let (status, response, _) =
            send(&setup.app, method, "/todos/123abc", Some(&token), body).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{} /todos/123abc", method);
        assert_eq!(response["message"], "Invalid id.");
    }
}

#[tokio::test]
async fn delete_returns_document_and_removes_it() {
    let setup = TestSetup::new();
    let (_, token) = signup(&setup.app, "alice", "alice@example.com").await;
    let todo = create_todo(&setup.app, &token, "Mail the letter").await;
    let id = todo["id"].as_str().unwrap();

    let (status, body, _) = send(
        &setup.app,
        "DELETE",
        &format!("/todos/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], todo["id"]);
    assert_eq!(setup.todo_repository.todo_count(), 0);

    // Gone now
    let (status, body, _) = send(
        &setup.app,
        "GET",
        &format!("/todos/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No matching todo found!");
}

#[tokio::test]
async fn patch_updates_title_and_description() {
    let setup = TestSetup::new();
    let (_, token) = signup(&setup.app, "alice", "alice@example.com").await;
    let todo = create_todo(&setup.app, &token, "Mail the letter").await;
    let id = todo["id"].as_str().unwrap();

    let (status, body, _) = send(
        &setup.app,
        "PATCH",
        &format!("/todos/{}", id),
        Some(&token),
        Some(serde_json::json!({ "title": "Mail the parcel", "description": "Box it first" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Mail the parcel");
    assert_eq!(body["description"], "Box it first");
    // No completed flag in the payload counts as not completed
    assert_eq!(body["completed"], false);
    assert!(body["completed_at"].is_null());
}
