//! Subjects, courses, session years, and the course↔batch association.

use serde::Deserialize;
use serde_json::json;

use crate::app::App;
use crate::error::ApiError;
use crate::ipc::error::{fail, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::stores::courses::CourseDraft;
use crate::stores::session_years::SessionYearDraft;
use crate::stores::subjects::SubjectDraft;
use crate::views;

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

#[derive(Deserialize)]
struct SubjectUpdateParams {
    id: String,
    #[serde(flatten)]
    draft: SubjectDraft,
}

#[derive(Deserialize)]
struct CourseUpdateParams {
    id: String,
    #[serde(flatten)]
    draft: CourseDraft,
}

#[derive(Deserialize)]
struct SessionYearUpdateParams {
    id: String,
    #[serde(flatten)]
    draft: SessionYearDraft,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeePreviewParams {
    subject_ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachParams {
    course_id: String,
    batch_ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseIdParams {
    course_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetachParams {
    course_id: String,
    batch_id: String,
}

pub async fn try_handle(app: &App, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.fetch" => Some(match app.subjects.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.subjects.snapshot())),
        }),
        "subjects.snapshot" => Some(ok(&req.id, json!(app.subjects.snapshot()))),
        "subjects.create" => {
            let draft: SubjectDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.subjects.create(&draft).await {
                Ok(subject) => ok(&req.id, json!({ "subject": subject })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "subjects.update" => {
            let params: SubjectUpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.subjects.update(&params.id, &params.draft).await {
                Ok(subject) => ok(&req.id, json!({ "subject": subject })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "subjects.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.subjects.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.subjects.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "courses.fetch" => Some(match app.courses.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.courses.snapshot())),
        }),
        "courses.snapshot" => Some(ok(&req.id, json!(app.courses.snapshot()))),
        // Derived-only total for the course builder: the sum of the
        // selected subjects' fees from the already-fetched subject cache.
        "courses.feePreview" => {
            let params: FeePreviewParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let subjects = app.subjects.snapshot().items;
            let total = views::fee_total(&subjects, &params.subject_ids);
            Some(ok(&req.id, json!({ "courseFee": total })))
        }
        "courses.create" => {
            let draft: CourseDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.courses.create(&draft).await {
                Ok(course) => ok(&req.id, json!({ "course": course })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "courses.update" => {
            let params: CourseUpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.courses.update(&params.id, &params.draft).await {
                Ok(course) => ok(&req.id, json!({ "course": course })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "courses.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.courses.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.courses.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "sessionYears.fetch" => Some(match app.session_years.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.session_years.snapshot())),
        }),
        "sessionYears.snapshot" => Some(ok(&req.id, json!(app.session_years.snapshot()))),
        "sessionYears.create" => {
            let draft: SessionYearDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.session_years.create(&draft).await {
                Ok(year) => ok(&req.id, json!({ "sessionYear": year })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "sessionYears.update" => {
            let params: SessionYearUpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(
                match app.session_years.update(&params.id, &params.draft).await {
                    Ok(year) => ok(&req.id, json!({ "sessionYear": year })),
                    Err(e) => fail(&req.id, &e),
                },
            )
        }
        "sessionYears.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.session_years.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.session_years.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "courseBatches.attach" => {
            let params: AttachParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(
                match app
                    .course_batches
                    .attach(&params.course_id, &params.batch_ids)
                    .await
                {
                    Ok(()) => ok(&req.id, json!(app.course_batches.snapshot())),
                    Err(e) => fail(&req.id, &e),
                },
            )
        }
        "courseBatches.fetch" => {
            let params: CourseIdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(
                match app.course_batches.fetch_for_course(&params.course_id).await {
                    Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
                    _ => ok(&req.id, json!(app.course_batches.snapshot())),
                },
            )
        }
        "courseBatches.detach" => {
            let params: DetachParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(
                match app
                    .course_batches
                    .detach(&params.course_id, &params.batch_id)
                    .await
                {
                    Ok(()) => ok(&req.id, json!(app.course_batches.snapshot())),
                    Err(e) => fail(&req.id, &e),
                },
            )
        }
        "courseBatches.snapshot" => Some(ok(&req.id, json!(app.course_batches.snapshot()))),
        "courseBatches.clearMessages" => {
            app.course_batches.clear_messages();
            Some(ok(&req.id, json!(app.course_batches.snapshot())))
        }
        _ => None,
    }
}
