mod support;

use serde_json::{json, Value};

use mybuddyd::api::Verb;
use mybuddyd::ipc::router::handle_request;
use mybuddyd::ipc::types::Request;
use support::{app_over, subject_json, teacher_json, FakeBackend};

fn request(id: &str, method: &str, params: Value) -> Request {
    Request {
        id: id.to_string(),
        method: method.to_string(),
        params,
    }
}

#[tokio::test]
async fn fee_preview_sums_only_the_selected_subjects() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/subjects",
        200,
        json!([
            subject_json("su1", "Maths", 100.0),
            subject_json("su2", "Physics", 250.0),
            subject_json("su3", "Games", 0.0),
        ]),
    );
    let app = app_over(&backend);
    app.subjects.fetch().await.expect("seed subjects");

    let all = handle_request(
        &app,
        request("1", "courses.feePreview", json!({ "subjectIds": ["su1", "su2", "su3"] })),
    )
    .await;
    assert_eq!(all["result"]["courseFee"], 350.0);

    let fewer = handle_request(
        &app,
        request("2", "courses.feePreview", json!({ "subjectIds": ["su1", "su3"] })),
    )
    .await;
    assert_eq!(fewer["result"]["courseFee"], 100.0);

    // Previews are derived from the cache; no extra requests were made.
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn local_search_narrows_the_rendered_rows_without_touching_the_store() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/teachers",
        200,
        json!({
            "success": true,
            "data": [teacher_json("t1", "Anita Rao"), teacher_json("t2", "Vikram Shah")],
        }),
    );
    let app = app_over(&backend);
    app.teachers.fetch().await.expect("seed teachers");

    let narrowed = handle_request(
        &app,
        request("1", "teachers.localSearch", json!({ "query": "RAO" })),
    )
    .await;
    let rows = narrowed["result"]["teachers"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Anita Rao");

    // The underlying collection still holds everything.
    assert_eq!(app.teachers.snapshot().items.len(), 2);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn csv_export_writes_the_loaded_page_and_issues_no_fetch() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("teachers.csv");
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/teachers",
        200,
        json!({
            "success": true,
            "data": [teacher_json("t1", "Anita Rao"), teacher_json("t2", "Vikram Shah")],
        }),
    );
    let app = app_over(&backend);
    app.teachers.fetch().await.expect("seed teachers");

    let before = backend.request_count();
    let resp = handle_request(
        &app,
        request(
            "1",
            "teachers.exportCsv",
            json!({ "path": out.to_string_lossy() }),
        ),
    )
    .await;
    assert_eq!(resp["ok"], true);
    assert_eq!(resp["result"]["rows"], 2);
    assert_eq!(backend.request_count(), before, "export never fetches");

    let csv = std::fs::read_to_string(&out).expect("read export");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("name,subject,gender,phone"));
    assert_eq!(lines.next(), Some("Anita Rao,,female,98400"));
    assert_eq!(lines.next(), Some("Vikram Shah,,female,98400"));
}

#[tokio::test]
async fn exporting_an_empty_store_writes_just_the_header() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("students.csv");
    let backend = FakeBackend::new();
    let app = app_over(&backend);

    let resp = handle_request(
        &app,
        request(
            "1",
            "students.exportCsv",
            json!({ "path": out.to_string_lossy() }),
        ),
    )
    .await;
    assert_eq!(resp["ok"], true);
    assert_eq!(resp["result"]["rows"], 0);
    let csv = std::fs::read_to_string(&out).expect("read export");
    assert_eq!(csv, "name,email,fatherPhone,address\n");
}
