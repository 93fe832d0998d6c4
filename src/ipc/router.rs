use super::handlers;
use super::types::Request;
use crate::app::App;
use crate::ipc::error::err;

pub async fn handle_request(app: &App, req: Request) -> serde_json::Value {
    if let Some(resp) = handlers::core::try_handle(app, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::students::try_handle(app, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::teachers::try_handle(app, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::institutes::try_handle(app, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::catalog::try_handle(app, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::batches::try_handle(app, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::sessions::try_handle(app, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::exports::try_handle(app, &req).await {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
    )
}
