mod support;

use serde_json::json;

use mybuddyd::api::Verb;
use mybuddyd::error::ApiError;
use mybuddyd::stores::subjects::SubjectDraft;
use support::{app_over, subject_json, FakeBackend};

async fn seeded_app(backend: &std::sync::Arc<FakeBackend>) -> mybuddyd::app::App {
    backend.stub(
        Verb::Get,
        "/subjects",
        200,
        json!([
            subject_json("su1", "Maths", 100.0),
            subject_json("su2", "Physics", 250.0),
        ]),
    );
    let app = app_over(backend);
    app.subjects.fetch().await.expect("seed subjects");
    app
}

#[tokio::test]
async fn create_appends_the_new_record_exactly_once() {
    let backend = FakeBackend::new();
    let app = seeded_app(&backend).await;
    backend.stub(
        Verb::Post,
        "/create_subject",
        201,
        json!({ "subject": subject_json("su3", "Chemistry", 300.0) }),
    );

    let before = app.subjects.snapshot().items;
    let created = app
        .subjects
        .create(&SubjectDraft {
            name: "Chemistry".to_string(),
            subject_fee: 300.0,
            description: None,
        })
        .await
        .expect("create subject");
    assert_eq!(created.id, "su3");

    let after = app.subjects.snapshot().items;
    assert_eq!(after.len(), 3);
    assert_eq!(after.iter().filter(|s| s.id == "su3").count(), 1);
    // Existing records are untouched.
    assert_eq!(&after[..2], &before[..]);
}

#[tokio::test]
async fn update_replaces_in_place_and_leaves_others_alone() {
    let backend = FakeBackend::new();
    let app = seeded_app(&backend).await;
    backend.stub(
        Verb::Put,
        "/update_subject/su2",
        200,
        json!({ "subject": subject_json("su2", "Applied Physics", 275.0) }),
    );

    let before = app.subjects.snapshot().items;
    app.subjects
        .update(
            "su2",
            &SubjectDraft {
                name: "Applied Physics".to_string(),
                subject_fee: 275.0,
                description: None,
            },
        )
        .await
        .expect("update subject");

    let after = app.subjects.snapshot().items;
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1].name, "Applied Physics");
    assert_eq!(after[1].subject_fee, 275.0);
}

#[tokio::test]
async fn update_response_for_unknown_id_is_dropped_silently() {
    let backend = FakeBackend::new();
    let app = seeded_app(&backend).await;
    backend.stub(
        Verb::Put,
        "/update_subject/ghost",
        200,
        json!({ "subject": subject_json("ghost", "Phantom Studies", 1.0) }),
    );

    let before = app.subjects.snapshot().items;
    app.subjects
        .update("ghost", &SubjectDraft::default())
        .await
        .expect("update call itself succeeds");
    assert_eq!(app.subjects.snapshot().items, before);
}

#[tokio::test]
async fn delete_is_idempotent_against_the_cache() {
    let backend = FakeBackend::new();
    let app = seeded_app(&backend).await;
    backend.stub(Verb::Delete, "/delete_subject/su1", 200, json!({ "message": "ok" }));

    app.subjects.delete("su1").await.expect("first delete");
    assert_eq!(app.subjects.snapshot().items.len(), 1);

    // Deleting the same id again neither errors the store nor changes it.
    app.subjects.delete("su1").await.expect("second delete");
    let after = app.subjects.snapshot();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].id, "su2");
    assert_eq!(after.error, None);
}

#[tokio::test]
async fn rejected_create_leaves_the_collection_untouched() {
    let backend = FakeBackend::new();
    let app = seeded_app(&backend).await;
    backend.stub(
        Verb::Post,
        "/create_subject",
        400,
        json!({ "message": "Subject name is required" }),
    );

    let before = app.subjects.snapshot();
    let outcome = app.subjects.create(&SubjectDraft::default()).await;
    match outcome {
        Err(ApiError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Subject name is required");
        }
        other => panic!("expected a validation rejection, got {other:?}"),
    }

    let after = app.subjects.snapshot();
    assert_eq!(after.items, before.items);
    // Mutation failures go to the caller, not into store state.
    assert_eq!(after.error, None);
}

#[tokio::test]
async fn not_found_update_does_not_guess_patch_local_state() {
    let backend = FakeBackend::new();
    let app = seeded_app(&backend).await;
    backend.stub(
        Verb::Put,
        "/update_subject/su2",
        404,
        json!({ "message": "No subject found" }),
    );

    let before = app.subjects.snapshot().items;
    let outcome = app.subjects.update("su2", &SubjectDraft::default()).await;
    assert_eq!(
        outcome,
        Err(ApiError::NotFound("No subject found".to_string()))
    );
    assert_eq!(app.subjects.snapshot().items, before);
}
