use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::Course;
use crate::store::{CollectionState, Sequencer};

/// Course-builder form. `course_fee` is derived from the selected
/// subjects before submission (see `views::FeeSelection`); the server
/// stores what it is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub name: String,
    #[serde(default)]
    pub course_type: String,
    #[serde(default)]
    pub course_fee: f64,
    #[serde(default)]
    pub session_year: String,
    #[serde(default)]
    pub subject_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CourseEnvelope {
    course: Course,
}

pub struct CourseStore {
    client: ApiClient,
    state: Mutex<CollectionState<Course>>,
    fetches: Sequencer,
}

impl CourseStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Course> {
        self.state.lock().expect("course state poisoned").clone()
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("course state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/courses", Vec::new())
            .await
            .and_then(from_value::<Vec<Course>>);
        let mut state = self.state.lock().expect("course state poisoned");
        match outcome {
            Ok(items) => {
                state.fetch_succeeded(seq, items, None);
                Ok(())
            }
            Err(e) => {
                state.fetch_failed(seq, e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: &CourseDraft) -> Result<Course, ApiError> {
        let value = self
            .client
            .post("/create_course", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: CourseEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("course state poisoned")
            .created(envelope.course.clone());
        Ok(envelope.course)
    }

    pub async fn update(&self, id: &str, draft: &CourseDraft) -> Result<Course, ApiError> {
        let value = self
            .client
            .put(&format!("/update_course/{id}"), ApiBody::Json(json!(draft)))
            .await?;
        let envelope: CourseEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("course state poisoned")
            .updated(envelope.course.clone());
        Ok(envelope.course)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/delete_course/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("course state poisoned")
            .removed(id);
        Ok(())
    }
}
