//! Batches, batch classes, and batch-student enrolment.

use serde::Deserialize;
use serde_json::json;

use crate::app::App;
use crate::error::ApiError;
use crate::ipc::error::{fail, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::stores::batch_classes::BatchClassDraft;
use crate::stores::batch_students::EnrolmentDraft;
use crate::stores::batches::BatchDraft;

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

#[derive(Deserialize)]
struct BatchClassUpdateParams {
    id: String,
    #[serde(flatten)]
    draft: BatchClassDraft,
}

pub async fn try_handle(app: &App, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "batches.fetch" => Some(match app.batches.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.batches.snapshot())),
        }),
        "batches.snapshot" => Some(ok(&req.id, json!(app.batches.snapshot()))),
        "batches.create" => {
            let draft: BatchDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.batches.create(&draft).await {
                Ok(batch) => ok(&req.id, json!({ "batch": batch })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "batches.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.batches.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.batches.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "batchClasses.fetch" => Some(match app.batch_classes.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.batch_classes.snapshot())),
        }),
        "batchClasses.snapshot" => Some(ok(&req.id, json!(app.batch_classes.snapshot()))),
        "batchClasses.create" => {
            let draft: BatchClassDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.batch_classes.create(&draft).await {
                Ok(class) => ok(&req.id, json!({ "batchClass": class })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "batchClasses.update" => {
            let params: BatchClassUpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.batch_classes.update(&params.id, &params.draft).await {
                Ok(class) => ok(&req.id, json!({ "batchClass": class })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "batchClasses.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.batch_classes.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.batch_classes.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "batchStudents.fetch" => Some(match app.batch_students.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.batch_students.snapshot())),
        }),
        "batchStudents.snapshot" => Some(ok(&req.id, json!(app.batch_students.snapshot()))),
        "batchStudents.enrol" => {
            let draft: EnrolmentDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.batch_students.create(&draft).await {
                Ok(enrolment) => ok(&req.id, json!({ "batchStudent": enrolment })),
                Err(e) => fail(&req.id, &e),
            })
        }
        _ => None,
    }
}
