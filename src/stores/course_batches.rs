use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::Batch;

/// Which batches belong to which course, keyed by course id. This is an
/// association view rather than a flat collection, so it does not reuse
/// `CollectionState`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBatchState {
    pub course_batches: BTreeMap<String, Vec<Batch>>,
    pub success_message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AttachReply {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchesForCourse {
    batches: Vec<Batch>,
}

pub struct CourseBatchStore {
    client: ApiClient,
    state: Mutex<CourseBatchState>,
}

impl CourseBatchStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CourseBatchState::default()),
        }
    }

    pub fn snapshot(&self) -> CourseBatchState {
        self.state
            .lock()
            .expect("course-batch state poisoned")
            .clone()
    }

    pub fn clear_messages(&self) {
        let mut state = self.state.lock().expect("course-batch state poisoned");
        state.success_message = None;
        state.error = None;
    }

    /// Associates a set of batches with a course. The association list
    /// for that course is stale afterwards until re-fetched.
    pub async fn attach(&self, course_id: &str, batch_ids: &[String]) -> Result<(), ApiError> {
        let body = json!({ "courseId": course_id, "batchIds": batch_ids });
        let outcome = self.client.post("/add-batches", ApiBody::Json(body)).await;
        let mut state = self.state.lock().expect("course-batch state poisoned");
        match outcome {
            Ok(value) => {
                let reply = from_value::<AttachReply>(value).unwrap_or(AttachReply {
                    message: None,
                });
                state.success_message = reply.message;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // The backend route is spelled "batchebycourse"; match it as-is.
    pub async fn fetch_for_course(&self, course_id: &str) -> Result<Vec<Batch>, ApiError> {
        let outcome = self
            .client
            .get(&format!("/batchebycourse/{course_id}/batches"), Vec::new())
            .await
            .and_then(from_value::<BatchesForCourse>);
        let mut state = self.state.lock().expect("course-batch state poisoned");
        match outcome {
            Ok(reply) => {
                state
                    .course_batches
                    .insert(course_id.to_string(), reply.batches.clone());
                state.error = None;
                Ok(reply.batches)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Detach one batch; mirrors the removal locally without a re-fetch.
    pub async fn detach(&self, course_id: &str, batch_id: &str) -> Result<(), ApiError> {
        let body = json!({ "courseId": course_id, "batchId": batch_id });
        self.client
            .delete("/remove-batch", Some(ApiBody::Json(body)))
            .await?;
        let mut state = self.state.lock().expect("course-batch state poisoned");
        if let Some(batches) = state.course_batches.get_mut(course_id) {
            batches.retain(|batch| batch.id != batch_id);
        }
        Ok(())
    }
}
