use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::{Attendance, Student};
use crate::store::{CollectionState, Pagination, Sequencer};

/// Server-side filters for the attendance register.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub attendance_source: Option<String>,
    #[serde(default)]
    pub attendance_type: Option<String>,
    #[serde(default = "AttendanceQuery::first_page")]
    pub page: u64,
    #[serde(default = "AttendanceQuery::default_limit")]
    pub limit: u64,
}

impl AttendanceQuery {
    fn first_page() -> u64 {
        1
    }

    fn default_limit() -> u64 {
        10
    }
}

impl Default for AttendanceQuery {
    fn default() -> Self {
        Self {
            session_id: None,
            student_id: None,
            attendance_source: None,
            attendance_type: None,
            page: 1,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDraft {
    pub session_id: String,
    pub student_id: String,
    #[serde(default)]
    pub attendance_type: String,
    #[serde(default)]
    pub attendance_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AttendancePage {
    data: Vec<Attendance>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct AttendanceEnvelope {
    attendance: Attendance,
}

#[derive(Debug, Deserialize)]
struct EligibleStudents {
    students: Vec<Student>,
}

/// Attendance register plus the eligible-student roster for one session.
pub struct AttendanceStore {
    client: ApiClient,
    state: Mutex<CollectionState<Attendance>>,
    eligible: Mutex<Vec<Student>>,
    fetches: Sequencer,
}

impl AttendanceStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            eligible: Mutex::new(Vec::new()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Attendance> {
        self.state.lock().expect("attendance state poisoned").clone()
    }

    pub fn eligible_students(&self) -> Vec<Student> {
        self.eligible
            .lock()
            .expect("eligible roster poisoned")
            .clone()
    }

    pub async fn fetch(&self, query: &AttendanceQuery) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("attendance state poisoned")
            .fetch_started(seq);

        let mut params = vec![
            ("page".to_string(), query.page.max(1).to_string()),
            ("limit".to_string(), query.limit.to_string()),
        ];
        let mut push = |name: &str, value: &Option<String>| {
            if let Some(value) = value {
                params.push((name.to_string(), value.clone()));
            }
        };
        push("sessionId", &query.session_id);
        push("studentId", &query.student_id);
        push("attendanceSource", &query.attendance_source);
        push("attendanceType", &query.attendance_type);

        let outcome = self
            .client
            .get("/attendances", params)
            .await
            .and_then(from_value::<AttendancePage>);
        let mut state = self.state.lock().expect("attendance state poisoned");
        match outcome {
            Ok(page) => {
                state.fetch_succeeded(seq, page.data, page.pagination);
                Ok(())
            }
            Err(e) => {
                state.fetch_failed(seq, e.to_string());
                Err(e)
            }
        }
    }

    pub async fn fetch_eligible(&self, session_id: &str) -> Result<Vec<Student>, ApiError> {
        let value = self
            .client
            .get(
                &format!("/sessions/{session_id}/eligible-students"),
                Vec::new(),
            )
            .await?;
        let roster: EligibleStudents = from_value(value)?;
        *self.eligible.lock().expect("eligible roster poisoned") = roster.students.clone();
        Ok(roster.students)
    }

    pub async fn create(&self, draft: &AttendanceDraft) -> Result<Attendance, ApiError> {
        let value = self
            .client
            .post("/attendance", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: AttendanceEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("attendance state poisoned")
            .created(envelope.attendance.clone());
        Ok(envelope.attendance)
    }

    pub async fn update(&self, id: &str, draft: &AttendanceDraft) -> Result<Attendance, ApiError> {
        let value = self
            .client
            .put(&format!("/attendance/{id}"), ApiBody::Json(json!(draft)))
            .await?;
        let envelope: AttendanceEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("attendance state poisoned")
            .updated(envelope.attendance.clone());
        Ok(envelope.attendance)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/attendance/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("attendance state poisoned")
            .removed(id);
        Ok(())
    }
}
