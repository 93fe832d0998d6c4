mod support;

use serde_json::{json, Value};

use mybuddyd::api::Verb;
use mybuddyd::app::App;
use mybuddyd::ipc::router::handle_request;
use mybuddyd::ipc::types::Request;
use support::{app_over, login_grant, student_json, FakeBackend};

fn request(id: &str, method: &str, params: Value) -> Request {
    Request {
        id: id.to_string(),
        method: method.to_string(),
        params,
    }
}

async fn call(app: &App, id: &str, method: &str, params: Value) -> Value {
    let resp = handle_request(app, request(id, method, params)).await;
    assert_eq!(resp["id"], id);
    resp
}

#[tokio::test]
async fn health_reports_version_and_auth_state() {
    let backend = FakeBackend::new();
    let app = app_over(&backend);

    let resp = call(&app, "1", "health", Value::Null).await;
    assert_eq!(resp["ok"], true);
    assert!(resp["result"]["version"].is_string());
    assert_eq!(resp["result"]["authenticated"], false);
}

#[tokio::test]
async fn unknown_methods_answer_not_implemented() {
    let backend = FakeBackend::new();
    let app = app_over(&backend);

    let resp = call(&app, "2", "students.reticulate", Value::Null).await;
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "not_implemented");
}

#[tokio::test]
async fn login_route_access_and_fetch_flow() {
    let backend = FakeBackend::new();
    backend.stub(Verb::Post, "/auth/login", 200, login_grant("tok-1", "admin"));
    backend.stub(
        Verb::Get,
        "/students",
        200,
        json!({
            "students": [student_json("st1", "Ravi Kumar")],
            "totalPages": 3,
            "currentPage": 1,
        }),
    );
    let app = app_over(&backend);

    let gate = call(&app, "3", "auth.routeAccess", json!({ "allowedRoles": ["admin"] })).await;
    assert_eq!(gate["result"]["access"], "redirectLogin");

    let login = call(
        &app,
        "4",
        "auth.login",
        json!({ "email": "admin@example.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(login["ok"], true);
    assert_eq!(login["result"]["isAuthenticated"], true);
    assert_eq!(login["result"]["role"], "admin");

    let gate = call(&app, "5", "auth.routeAccess", json!({ "allowedRoles": ["teacher"] })).await;
    assert_eq!(gate["result"]["access"], "redirectUnauthorized");

    let fetched = call(&app, "6", "students.fetch", json!({ "page": 1, "limit": 10 })).await;
    assert_eq!(fetched["ok"], true);
    assert_eq!(fetched["result"]["status"], "succeeded");
    assert_eq!(fetched["result"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(fetched["result"]["pagination"]["totalPages"], 3);

    let logout = call(&app, "7", "auth.logout", Value::Null).await;
    assert_eq!(logout["result"]["isAuthenticated"], false);
}

#[tokio::test]
async fn failed_login_keeps_the_taxonomy_code() {
    let backend = FakeBackend::new();
    backend.stub(
        Verb::Post,
        "/auth/login",
        401,
        json!({ "message": "Invalid credentials" }),
    );
    let app = app_over(&backend);

    let resp = call(
        &app,
        "8",
        "auth.login",
        json!({ "email": "x@example.com", "password": "nope123" }),
    )
    .await;
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn bad_params_are_rejected_before_any_network_call() {
    let backend = FakeBackend::new();
    let app = app_over(&backend);

    let resp = call(&app, "9", "auth.login", json!({ "email": "only" })).await;
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "bad_params");
    assert_eq!(backend.request_count(), 0);
}
