mod support;

use serde_json::json;

use mybuddyd::api::Verb;
use mybuddyd::stores::attendance::{AttendanceDraft, AttendanceQuery};
use support::{app_over, student_json, FakeBackend};

fn attendance_json(id: &str, session: &str, kind: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "sessionId": session,
        "studentId": student_json("st1", "Ravi Kumar"),
        "attendanceType": kind,
        "attendanceSource": "manual",
    })
}

#[tokio::test]
async fn filters_travel_as_query_parameters_and_pagination_is_kept() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/attendances",
        200,
        json!({
            "data": [attendance_json("a1", "cs1", "present")],
            "pagination": { "currentPage": 2, "totalPages": 5, "totalRecords": 41 },
        }),
    );
    let app = app_over(&backend);

    let query = AttendanceQuery {
        session_id: Some("cs1".to_string()),
        attendance_type: Some("present".to_string()),
        page: 2,
        ..AttendanceQuery::default()
    };
    app.attendance.fetch(&query).await.expect("fetch register");

    let snapshot = app.attendance.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    // The joined student came back expanded; the raw session id did not.
    let record = &snapshot.items[0];
    assert_eq!(record.session_id.as_ref().map(|r| r.id()), Some("cs1"));
    assert!(record.session_id.as_ref().unwrap().resolved().is_none());
    assert_eq!(
        record.student_id.as_ref().and_then(|r| r.resolved()).map(|s| s.name.as_str()),
        Some("Ravi Kumar")
    );

    let pagination = snapshot.pagination.expect("pagination block");
    assert_eq!(pagination.current_page, 2);
    assert_eq!(pagination.total_pages, 5);
    assert_eq!(pagination.total_records, 41);

    let sent = &backend.requests()[0];
    assert!(sent.query.iter().any(|(k, v)| k == "sessionId" && v == "cs1"));
    assert!(sent
        .query
        .iter()
        .any(|(k, v)| k == "attendanceType" && v == "present"));
    assert!(sent.query.iter().any(|(k, v)| k == "page" && v == "2"));
    assert!(!sent.query.iter().any(|(k, _)| k == "studentId"));
}

#[tokio::test]
async fn eligible_roster_is_fetched_per_session() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/sessions/cs1/eligible-students",
        200,
        json!({ "students": [student_json("st1", "Ravi Kumar"), student_json("st2", "Meena Iyer")] }),
    );
    let app = app_over(&backend);

    let roster = app
        .attendance
        .fetch_eligible("cs1")
        .await
        .expect("fetch roster");
    assert_eq!(roster.len(), 2);
    assert_eq!(app.attendance.eligible_students().len(), 2);
}

#[tokio::test]
async fn create_update_delete_patch_the_register_in_memory() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Get,
        "/attendances",
        200,
        json!({
            "data": [attendance_json("a1", "cs1", "present")],
            "pagination": { "currentPage": 1, "totalPages": 1, "totalRecords": 1 },
        }),
    );
    backend.stub(
        Verb::Post,
        "/attendance",
        201,
        json!({ "attendance": attendance_json("a2", "cs1", "absent") }),
    );
    backend.stub(
        Verb::Put,
        "/attendance/a1",
        200,
        json!({ "attendance": attendance_json("a1", "cs1", "late") }),
    );
    backend.stub(Verb::Delete, "/attendance/a2", 200, json!({ "message": "ok" }));
    let app = app_over(&backend);

    app.attendance
        .fetch(&AttendanceQuery::default())
        .await
        .expect("seed register");

    let draft = AttendanceDraft {
        session_id: "cs1".to_string(),
        student_id: "st1".to_string(),
        attendance_type: "absent".to_string(),
        attendance_source: "manual".to_string(),
        date: None,
    };
    app.attendance.create(&draft).await.expect("create record");
    assert_eq!(app.attendance.snapshot().items.len(), 2);

    app.attendance.update("a1", &draft).await.expect("update record");
    let snapshot = app.attendance.snapshot();
    assert_eq!(
        snapshot.items[0].attendance_type.as_deref(),
        Some("late")
    );

    app.attendance.delete("a2").await.expect("delete record");
    let after = app.attendance.snapshot();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].id, "a1");
}
