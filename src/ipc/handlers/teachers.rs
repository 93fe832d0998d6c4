use std::path::Path;

use serde::Deserialize;
use serde_json::json;

use crate::api::FileUpload;
use crate::app::App;
use crate::error::ApiError;
use crate::ipc::error::{err, fail, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::stores::teachers::TeacherDraft;
use crate::views;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    #[serde(flatten)]
    draft: TeacherDraft,
    #[serde(default)]
    photo_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParams {
    id: String,
    #[serde(flatten)]
    draft: TeacherDraft,
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
    mut draft: TeacherDraft,
    photo_path: Option<String>,
) -> Result<TeacherDraft, serde_json::Value> {
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
        "teachers.fetch" => Some(match app.teachers.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.teachers.snapshot())),
        }),
        "teachers.snapshot" => Some(ok(&req.id, json!(app.teachers.snapshot()))),
        "teachers.get" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.teachers.fetch_by_id(&params.id).await {
                Ok(teacher) => ok(&req.id, json!({ "teacher": teacher })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "teachers.create" => {
            let params: CreateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let draft = match with_photo(req, params.draft, params.photo_path) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.teachers.create(&draft).await {
                Ok(teacher) => ok(&req.id, json!({ "teacher": teacher })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "teachers.update" => {
            let params: UpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let draft = match with_photo(req, params.draft, params.photo_path) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.teachers.update(&params.id, &draft).await {
                Ok(teacher) => ok(&req.id, json!({ "teacher": teacher })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "teachers.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.teachers.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.teachers.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "teachers.localSearch" => {
            let params: SearchParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let snapshot = app.teachers.snapshot();
            let rows = views::filter(&snapshot.items, &params.query);
            Some(ok(&req.id, json!({ "teachers": rows })))
        }
        _ => None,
    }
}
