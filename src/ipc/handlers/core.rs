use serde::Deserialize;
use serde_json::json;

use crate::app::App;
use crate::ipc::error::{fail, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::model::Role;

#[derive(Deserialize)]
struct LoginParams {
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteParams {
    allowed_roles: Vec<Role>,
}

pub async fn try_handle(app: &App, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(ok(
            &req.id,
            json!({
                "version": env!("CARGO_PKG_VERSION"),
                "authenticated": app.session.is_authenticated(),
            }),
        )),
        "auth.login" => {
            let params: LoginParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(
                match app
                    .session
                    .login(&app.client, &params.email, &params.password)
                    .await
                {
                    Ok(state) => ok(&req.id, json!(state)),
                    Err(e) => fail(&req.id, &e),
                },
            )
        }
        "auth.logout" => {
            app.session.logout();
            Some(ok(&req.id, json!(app.session.snapshot())))
        }
        "auth.session" => Some(ok(&req.id, json!(app.session.snapshot()))),
        "auth.routeAccess" => {
            let params: RouteParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let access = app.session.route_access(&params.allowed_roles);
            Some(ok(&req.id, json!({ "access": access })))
        }
        _ => None,
    }
}
