mod support;

use serde_json::json;

use mybuddyd::api::Verb;
use mybuddyd::error::ApiError;
use mybuddyd::model::Role;
use support::{app_over, login_grant, subject_json, FakeBackend};

#[tokio::test]
async fn bearer_token_rides_along_only_while_logged_in() {
    let backend = FakeBackend::new();
    backend.stub(Verb::Post, "/auth/login", 200, login_grant("tok-abc", "admin"));
    backend.stub(Verb::Get, "/subjects", 200, json!([subject_json("su1", "Maths", 100.0)]));
    let app = app_over(&backend);

    app.subjects.fetch().await.expect("anonymous fetch");
    app.session
        .login(&app.client, "admin@example.com", "secret1")
        .await
        .expect("login");
    app.subjects.fetch().await.expect("authenticated fetch");
    app.session.logout();
    app.subjects.fetch().await.expect("fetch after logout");

    let requests = backend.requests();
    assert_eq!(requests[0].bearer, None);
    // requests[1] is the login call itself, issued while logged out.
    assert_eq!(requests[1].bearer, None);
    assert_eq!(requests[2].bearer.as_deref(), Some("tok-abc"));
    assert_eq!(requests[3].bearer, None);
}

#[tokio::test]
async fn a_401_surfaces_as_the_same_unauthorized_error_from_any_store() {
    let backend = FakeBackend::new();
    backend.stub(Verb::Get, "/subjects", 401, json!({ "message": "jwt expired" }));
    backend.stub(Verb::Get, "/batches", 401, json!({ "message": "token invalid" }));
    backend.stub(Verb::Get, "/teachers", 403, json!({ "message": "forbidden" }));
    let app = app_over(&backend);

    assert_eq!(app.subjects.fetch().await, Err(ApiError::Unauthorized));
    assert_eq!(app.batches.fetch().await, Err(ApiError::Unauthorized));
    assert_eq!(app.teachers.fetch().await, Err(ApiError::Unauthorized));
}

#[tokio::test]
async fn overwriting_login_replaces_the_previous_grant() {
    let backend = FakeBackend::new();
    let app = app_over(&backend);

    let user = mybuddyd::model::UserProfile {
        id: "u1".to_string(),
        name: "First".to_string(),
        email: None,
    };
    app.session
        .login_success(user.clone(), "tok-1".to_string(), Role::Admin);
    let second = mybuddyd::model::UserProfile {
        id: "u2".to_string(),
        name: "Second".to_string(),
        email: None,
    };
    app.session
        .login_success(second, "tok-2".to_string(), Role::Teacher);

    let state = app.session.snapshot();
    assert_eq!(state.token.as_deref(), Some("tok-2"));
    assert_eq!(state.role, Some(Role::Teacher));
    assert_eq!(state.user.map(|u| u.id), Some("u2".to_string()));
}
