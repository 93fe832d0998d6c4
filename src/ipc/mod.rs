pub mod error;
pub mod handlers;
pub mod router;
pub mod types;

use serde::de::DeserializeOwned;

use types::Request;

/// Parses `params` into a typed shape, or builds the `bad_params`
/// response the handler should return as-is. Omitted params read as an
/// empty object so all-default shapes need no explicit `{}`.
pub(crate) fn parse_params<T: DeserializeOwned>(
    req: &Request,
) -> Result<T, serde_json::Value> {
    let params = if req.params.is_null() {
        serde_json::json!({})
    } else {
        req.params.clone()
    };
    serde_json::from_value(params).map_err(|e| error::err(&req.id, "bad_params", e.to_string()))
}
