mod support;

use serde_json::json;

use mybuddyd::api::{ApiBody, Verb};
use support::{app_over, batch_json, FakeBackend};

#[tokio::test]
async fn attach_fetch_and_detach_keep_the_per_course_map_in_step() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Post,
        "/add-batches",
        200,
        json!({ "message": "Batches added to course" }),
    );
    backend.stub(
        Verb::Get,
        "/batchebycourse/c1/batches",
        200,
        json!({ "batches": [batch_json("b1", "Morning"), batch_json("b2", "Evening")] }),
    );
    backend.stub(Verb::Delete, "/remove-batch", 200, json!({ "message": "removed" }));
    let app = app_over(&backend);

    app.course_batches
        .attach("c1", &["b1".to_string(), "b2".to_string()])
        .await
        .expect("attach batches");
    let state = app.course_batches.snapshot();
    assert_eq!(
        state.success_message.as_deref(),
        Some("Batches added to course")
    );

    // The attach body carries the course and batch ids together.
    match backend.requests()[0].body.clone() {
        Some(ApiBody::Json(body)) => {
            assert_eq!(body["courseId"], "c1");
            assert_eq!(body["batchIds"], json!(["b1", "b2"]));
        }
        other => panic!("expected JSON body, got {other:?}"),
    }

    let batches = app
        .course_batches
        .fetch_for_course("c1")
        .await
        .expect("fetch course batches");
    assert_eq!(batches.len(), 2);
    assert_eq!(
        app.course_batches.snapshot().course_batches["c1"].len(),
        2
    );

    app.course_batches
        .detach("c1", "b1")
        .await
        .expect("detach batch");
    let state = app.course_batches.snapshot();
    let remaining = &state.course_batches["c1"];
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "b2");

    // The removal endpoint takes its target in a DELETE body.
    let last = backend.requests().pop().expect("last request");
    assert_eq!(last.verb, Verb::Delete);
    match last.body {
        Some(ApiBody::Json(body)) => {
            assert_eq!(body["courseId"], "c1");
            assert_eq!(body["batchId"], "b1");
        }
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[tokio::test]
async fn clearing_messages_resets_both_message_and_error() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Post,
        "/add-batches",
        400,
        json!({ "message": "Course not found" }),
    );
    let app = app_over(&backend);

    assert!(app
        .course_batches
        .attach("ghost", &["b1".to_string()])
        .await
        .is_err());
    assert_eq!(
        app.course_batches.snapshot().error.as_deref(),
        Some("Course not found")
    );

    app.course_batches.clear_messages();
    let state = app.course_batches.snapshot();
    assert_eq!(state.error, None);
    assert_eq!(state.success_message, None);
}
