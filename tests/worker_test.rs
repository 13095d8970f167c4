//! Background job tests driven through the HTTP surface.

mod helpers;

use axum::http::StatusCode;
use files_core::traits::{JobState, QueueBackend};
use files_core::types::{JobId, UserId};
use helpers::{TestApp, b64, png};
use serde_json::json;

#[tokio::test]
async fn test_registration_enqueues_welcome() {
    let app = TestApp::new().await;
    app.register("bob@dylan.com", "toto1234!").await;

    let outcomes = app.run_jobs().await;
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].queue, "welcome_email");
    assert_eq!(outcomes[0].state, JobState::Completed);
    assert!(
        app.backends
            .queue
            .state(outcomes[0].id)
            .await
            .unwrap()
            .is_none()
    );

    assert!(app.run_jobs().await.is_empty());
}

#[tokio::test]
async fn test_thumbnail_job_for_someone_elses_file_fails() {
    let app = TestApp::new().await;
    let (_, bob) = app.signed_in("bob@dylan.com").await;
    let (ann_id, _) = app.signed_in("ann@example.com").await;

    let response = app
        .upload(
            &bob,
            json!({ "name": "photo.png", "type": "image", "data": b64(&png(64, 64)) }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let file_id = response.body["id"].as_str().unwrap().to_string();
    app.run_jobs().await;

    let id = app
        .backends
        .queue
        .push(
            "file_thumbnail",
            json!({ "fileId": file_id, "userId": ann_id }),
        )
        .await
        .unwrap();

    let outcomes = app.run_jobs().await;
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].id, id);
    assert_eq!(outcomes[0].state, JobState::Failed);
    assert_eq!(outcomes[0].error.as_deref(), Some("File not found"));
}

#[tokio::test]
async fn test_malformed_payloads_fail_without_retry() {
    let app = TestApp::new().await;

    let thumb = app
        .backends
        .queue
        .push("file_thumbnail", json!({ "userId": UserId::new().to_string() }))
        .await
        .unwrap();
    let welcome = app
        .backends
        .queue
        .push("welcome_email", json!({}))
        .await
        .unwrap();

    let outcomes = app.run_jobs().await;
    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        assert_eq!(outcome.state, JobState::Failed, "{outcome:?}");
    }
    let error = |id: JobId| {
        outcomes
            .iter()
            .find(|o| o.id == id)
            .and_then(|o| o.error.clone())
    };
    assert_eq!(error(thumb).as_deref(), Some("Missing fileId"));
    assert_eq!(error(welcome).as_deref(), Some("Missing userId"));
}
