use std::path::Path;

use serde::Deserialize;
use serde_json::json;

use crate::api::FileUpload;
use crate::app::App;
use crate::error::ApiError;
use crate::ipc::error::{err, fail, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::stores::institutes::{InstituteDraft, InstituteQuery};
use crate::stores::locations::LocationDraft;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    #[serde(flatten)]
    draft: InstituteDraft,
    #[serde(default)]
    logo_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParams {
    id: String,
    #[serde(flatten)]
    draft: InstituteDraft,
    #[serde(default)]
    logo_path: Option<String>,
}

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

#[derive(Deserialize)]
struct LocationUpdateParams {
    id: String,
    #[serde(flatten)]
    draft: LocationDraft,
}

fn with_logo(
    req: &Request,
    mut draft: InstituteDraft,
    logo_path: Option<String>,
) -> Result<InstituteDraft, serde_json::Value> {
    if let Some(path) = logo_path {
        match FileUpload::from_path(Path::new(&path)) {
            Ok(file) => draft.logo = Some(file),
            Err(e) => {
                return Err(err(
                    &req.id,
                    "io_failed",
                    format!("failed to read {path}: {e}"),
                ))
            }
        }
    }
    Ok(draft)
}

pub async fn try_handle(app: &App, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "institutes.fetch" => {
            let query: InstituteQuery = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.institutes.fetch(&query).await {
                Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
                _ => ok(&req.id, json!(app.institutes.snapshot())),
            })
        }
        "institutes.snapshot" => Some(ok(&req.id, json!(app.institutes.snapshot()))),
        "institutes.create" => {
            let params: CreateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let draft = match with_logo(req, params.draft, params.logo_path) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.institutes.create(&draft).await {
                Ok(institute) => ok(&req.id, json!({ "institute": institute })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "institutes.update" => {
            let params: UpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let draft = match with_logo(req, params.draft, params.logo_path) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.institutes.update(&params.id, &draft).await {
                Ok(institute) => ok(&req.id, json!({ "institute": institute })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "institutes.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.institutes.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.institutes.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "locations.fetch" => Some(match app.locations.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.locations.snapshot())),
        }),
        "locations.snapshot" => Some(ok(&req.id, json!(app.locations.snapshot()))),
        "locations.create" => {
            let draft: LocationDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.locations.create(&draft).await {
                Ok(location) => ok(&req.id, json!({ "location": location })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "locations.update" => {
            let params: LocationUpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.locations.update(&params.id, &params.draft).await {
                Ok(location) => ok(&req.id, json!({ "location": location })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "locations.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.locations.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.locations.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        _ => None,
    }
}
