mod support;

use std::collections::HashSet;

use serde_json::json;

use mybuddyd::api::Verb;
use mybuddyd::store::Status;
use mybuddyd::stores::students::StudentQuery;
use support::{app_over, student_json, FakeBackend};

#[tokio::test]
async fn search_fetch_then_local_delete_needs_no_refetch() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/students",
        200,
        json!({
            "students": [student_json("st1", "Ravi Kumar"), student_json("st2", "Ravindra Nair")],
            "totalPages": 1,
            "currentPage": 1,
        }),
    );
    backend.stub(Verb::Delete, "/delete/student/st1", 200, json!({ "message": "deleted" }));
    let app = app_over(&backend);

    let query = StudentQuery {
        search: Some("ravi".to_string()),
        ..StudentQuery::default()
    };
    app.students.fetch(&query).await.expect("fetch students");

    let snapshot = app.students.snapshot();
    assert_eq!(snapshot.status, Status::Succeeded);
    assert_eq!(snapshot.items.len(), 2);
    let ids: HashSet<&str> = snapshot.items.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.len(), 2, "identifiers are unique within the collection");
    let pagination = snapshot.pagination.expect("server-paginated resource");
    assert_eq!(pagination.current_page, 1);
    assert_eq!(pagination.total_pages, 1);

    // The search term went out as a query parameter.
    let first = &backend.requests()[0];
    assert!(first
        .query
        .iter()
        .any(|(k, v)| k == "search" && v == "ravi"));

    app.students.delete("st1").await.expect("delete student");

    let after = app.students.snapshot();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].id, "st2");
    // One fetch and one delete; the removal reflected locally without a
    // second list request.
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn refetching_unchanged_data_yields_equal_items() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/students",
        200,
        json!({
            "students": [student_json("st1", "Ravi Kumar")],
            "totalPages": 1,
            "currentPage": 1,
        }),
    );
    let app = app_over(&backend);

    let query = StudentQuery::default();
    app.students.fetch(&query).await.expect("first fetch");
    let first = app.students.snapshot();
    app.students.fetch(&query).await.expect("second fetch");
    let second = app.students.snapshot();

    assert_eq!(first.items, second.items);
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn fetch_failure_is_stored_and_cleared_by_next_fetch() {
    let backend = FakeBackend::new();
    backend.stub_transport_error(Verb::Get, "/students", "connection refused");
    backend.stub(
        Verb::Get,
        "/students",
        200,
        json!({ "students": [], "totalPages": 0, "currentPage": 1 }),
    );
    let app = app_over(&backend);

    let query = StudentQuery::default();
    assert!(app.students.fetch(&query).await.is_err());
    let failed = app.students.snapshot();
    assert_eq!(failed.status, Status::Failed);
    assert!(failed
        .error
        .as_deref()
        .expect("stored error")
        .contains("connection refused"));

    app.students.fetch(&query).await.expect("recovered fetch");
    let recovered = app.students.snapshot();
    assert_eq!(recovered.status, Status::Succeeded);
    assert_eq!(recovered.error, None);
}
