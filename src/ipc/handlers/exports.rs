//! CSV exports of already-fetched collections. These serialize whatever
//! page the store currently holds and never trigger a fetch.

use std::path::Path;

use serde::Deserialize;
use serde_json::json;

use crate::app::App;
use crate::ipc::error::{err, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::views;

#[derive(Deserialize)]
struct ExportParams {
    path: String,
}

pub async fn try_handle(app: &App, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teachers.exportCsv" => {
            let params: ExportParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let rows = app.teachers.snapshot().items;
            Some(match views::write_csv(&rows, Path::new(&params.path)) {
                Ok(count) => ok(&req.id, json!({ "path": params.path, "rows": count })),
                Err(e) => err(&req.id, "io_failed", format!("{e:#}")),
            })
        }
        "students.exportCsv" => {
            let params: ExportParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let rows = app.students.snapshot().items;
            Some(match views::write_csv(&rows, Path::new(&params.path)) {
                Ok(count) => ok(&req.id, json!({ "path": params.path, "rows": count })),
                Err(e) => err(&req.id, "io_failed", format!("{e:#}")),
            })
        }
        _ => None,
    }
}
