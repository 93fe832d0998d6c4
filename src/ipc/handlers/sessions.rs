//! Class sessions and the attendance register.

use serde::Deserialize;
use serde_json::json;

use crate::app::App;
use crate::error::ApiError;
use crate::ipc::error::{err, fail, ok};
use crate::ipc::parse_params;
use crate::ipc::types::Request;
use crate::stores::attendance::{AttendanceDraft, AttendanceQuery};
use crate::views::{Recurrence, ScheduleForm, SessionDraft};

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionParams {
    batch_class_id: String,
    #[serde(default = "SessionParams::default_status")]
    status: String,
    #[serde(default = "SessionParams::default_class_type")]
    class_type: String,
    #[serde(default = "SessionParams::default_mode")]
    session_mode: String,
    #[serde(default)]
    subject_id: String,
    #[serde(default)]
    teacher_id: String,
    #[serde(default)]
    absent_notification: bool,
    #[serde(default)]
    present_notification: bool,
    session_type: String,
    #[serde(default)]
    schedule_details: ScheduleForm,
}

impl SessionParams {
    fn default_status() -> String {
        "Active".to_string()
    }

    fn default_class_type() -> String {
        "Regular".to_string()
    }

    fn default_mode() -> String {
        "Online".to_string()
    }

    fn into_draft(self, req: &Request) -> Result<SessionDraft, serde_json::Value> {
        let recurrence = Recurrence::from_form(&self.session_type, &self.schedule_details)
            .map_err(|e| err(&req.id, "bad_params", e.to_string()))?;
        Ok(SessionDraft {
            batch_class_id: self.batch_class_id,
            status: self.status,
            class_type: self.class_type,
            session_mode: self.session_mode,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            absent_notification: self.absent_notification,
            present_notification: self.present_notification,
            start_time: self.schedule_details.start_time,
            end_time: self.schedule_details.end_time,
            recurrence,
        })
    }
}

#[derive(Deserialize)]
struct SessionUpdateParams {
    id: String,
    #[serde(flatten)]
    session: SessionParams,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EligibleParams {
    session_id: String,
}

#[derive(Deserialize)]
struct AttendanceUpdateParams {
    id: String,
    #[serde(flatten)]
    draft: AttendanceDraft,
}

pub async fn try_handle(app: &App, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "sessions.fetch" => Some(match app.class_sessions.fetch().await {
            Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
            _ => ok(&req.id, json!(app.class_sessions.snapshot())),
        }),
        "sessions.snapshot" => Some(ok(&req.id, json!(app.class_sessions.snapshot()))),
        "sessions.get" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.class_sessions.fetch_by_id(&params.id).await {
                Ok(session) => ok(&req.id, json!({ "session": session })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "sessions.clearSelected" => {
            app.class_sessions.clear_selected();
            Some(ok(&req.id, json!({ "selected": serde_json::Value::Null })))
        }
        "sessions.create" => {
            let params: SessionParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let draft = match params.into_draft(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let payload = match draft.payload() {
                Ok(v) => v,
                Err(e) => return Some(err(&req.id, "bad_params", e.to_string())),
            };
            Some(match app.class_sessions.create(payload).await {
                Ok(session) => ok(&req.id, json!({ "session": session })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "sessions.update" => {
            let params: SessionUpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let id = params.id;
            let draft = match params.session.into_draft(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            let payload = match draft.payload() {
                Ok(v) => v,
                Err(e) => return Some(err(&req.id, "bad_params", e.to_string())),
            };
            Some(match app.class_sessions.update(&id, payload).await {
                Ok(session) => ok(&req.id, json!({ "session": session })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "sessions.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.class_sessions.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.class_sessions.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        "attendance.fetch" => {
            let query: AttendanceQuery = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.attendance.fetch(&query).await {
                Err(e @ ApiError::Unauthorized) => fail(&req.id, &e),
                _ => ok(&req.id, json!(app.attendance.snapshot())),
            })
        }
        "attendance.snapshot" => Some(ok(&req.id, json!(app.attendance.snapshot()))),
        "attendance.eligible" => {
            let params: EligibleParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.attendance.fetch_eligible(&params.session_id).await {
                Ok(students) => ok(&req.id, json!({ "students": students })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "attendance.create" => {
            let draft: AttendanceDraft = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.attendance.create(&draft).await {
                Ok(record) => ok(&req.id, json!({ "attendance": record })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "attendance.update" => {
            let params: AttendanceUpdateParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.attendance.update(&params.id, &params.draft).await {
                Ok(record) => ok(&req.id, json!({ "attendance": record })),
                Err(e) => fail(&req.id, &e),
            })
        }
        "attendance.delete" => {
            let params: IdParams = match parse_params(req) {
                Ok(v) => v,
                Err(resp) => return Some(resp),
            };
            Some(match app.attendance.delete(&params.id).await {
                Ok(()) => ok(&req.id, json!(app.attendance.snapshot())),
                Err(e) => fail(&req.id, &e),
            })
        }
        _ => None,
    }
}
