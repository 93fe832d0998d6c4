use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::Subject;
use crate::store::{CollectionState, Sequencer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDraft {
    pub name: String,
    #[serde(default)]
    pub subject_fee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubjectEnvelope {
    subject: Subject,
}

pub struct SubjectStore {
    client: ApiClient,
    state: Mutex<CollectionState<Subject>>,
    fetches: Sequencer,
}

impl SubjectStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Subject> {
        self.state.lock().expect("subject state poisoned").clone()
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("subject state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/subjects", Vec::new())
            .await
            .and_then(from_value::<Vec<Subject>>);
        let mut state = self.state.lock().expect("subject state poisoned");
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

    pub async fn create(&self, draft: &SubjectDraft) -> Result<Subject, ApiError> {
        let value = self
            .client
            .post("/create_subject", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: SubjectEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("subject state poisoned")
            .created(envelope.subject.clone());
        Ok(envelope.subject)
    }

    pub async fn update(&self, id: &str, draft: &SubjectDraft) -> Result<Subject, ApiError> {
        let value = self
            .client
            .put(&format!("/update_subject/{id}"), ApiBody::Json(json!(draft)))
            .await?;
        let envelope: SubjectEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("subject state poisoned")
            .updated(envelope.subject.clone());
        Ok(envelope.subject)
    }

    /// Removal keys off the id the caller asked for, not the response.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/delete_subject/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("subject state poisoned")
            .removed(id);
        Ok(())
    }
}
