use std::path::Path;

use serde::Deserialize;
use serde_json::json;

use crate::api::FileUpload;
use crate::app::App;
use crate::error::ApiError;
use crate::ipc::error::{err, fail, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::stores::students::{StudentDraft, StudentQuery};
use crate::views;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    #[serde(flatten)]
    draft: StudentDraft,
    #[serde(default)]
    photo_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParams {
    id: String,
    #[serde(flatten)]
    draft: StudentDraft,
    #[serde(default)]
    photo_path: Option<String>,
}

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

fn with_photo(
    req: &Request,
    mut draft: StudentDraft,
    photo_path: Option<String>,
) -> Result<StudentDraft, serde_json::Value> {
    if let Some(path) = photo_path {
        match FileUpload::from_path(Path::new(&path)) {
            Ok(file) => draft.photo = Some(file),
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
        "students.fetch" => {
            let query: StudentQuery = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.students.fetch(&query).await {
                // Authorization failures route the shell to login; every
                // other fetch failure renders inline from the snapshot.
                Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
                _ => ok(&req.id, json!(app.students.snapshot())),
            })
        }
        "students.snapshot" => Some(ok(&req.id, json!(app.students.snapshot()))),
        "students.create" => {
            let params: CreateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let draft = match with_photo(req, params.draft, params.photo_path) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.students.create(&draft).await {
                Ok(student) => ok(&req.id, json!({ "student": student })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "students.update" => {
            let params: UpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let draft = match with_photo(req, params.draft, params.photo_path) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.students.update(&params.id, &draft).await {
                Ok(student) => ok(&req.id, json!({ "student": student })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "students.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.students.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.students.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "students.localSearch" => {
            let params: SearchParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let snapshot = app.students.snapshot();
            let rows = views::filter(&snapshot.items, &params.query);
            Some(ok(&req.id, json!({ "students": rows })))
        }
        _ => None,
    }
}
