use serde_json::json;

use crate::error::ApiError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(id: &str, code: &str, message: impl Into<String>) -> serde_json::Value {
    json!({
        "id": id,
        "ok": false,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}

/// Backend failures keep their taxonomy code, so a 401 from any resource
/// reaches the shell as the same `unauthorized` envelope.
pub fn fail(id: &str, error: &ApiError) -> serde_json::Value {
    err(id, error.code(), error.to_string())
}
