use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::BatchClass;
use crate::store::{CollectionState, Sequencer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchClassDraft {
    pub batch_id: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub teacher_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

#[derive(Debug, Deserialize)]
struct BatchClassList {
    data: Vec<BatchClass>,
}

#[derive(Debug, Deserialize)]
struct BatchClassEnvelope {
    data: BatchClass,
}

pub struct BatchClassStore {
    client: ApiClient,
    state: Mutex<CollectionState<BatchClass>>,
    fetches: Sequencer,
}

impl BatchClassStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<BatchClass> {
        self.state
            .lock()
            .expect("batch-class state poisoned")
            .clone()
    }

    // The list path really is "/batch-classess"; the backend route is
    // misspelled and clients must match it.
    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("batch-class state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/batch-classess", Vec::new())
            .await
            .and_then(from_value::<BatchClassList>);
        let mut state = self.state.lock().expect("batch-class state poisoned");
        match outcome {
            Ok(list) => {
                state.fetch_succeeded(seq, list.data, None);
                Ok(())
            }
            Err(e) => {
                state.fetch_failed(seq, e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: &BatchClassDraft) -> Result<BatchClass, ApiError> {
        let value = self
            .client
            .post("/batch-class", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: BatchClassEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("batch-class state poisoned")
            .created(envelope.data.clone());
        Ok(envelope.data)
    }

    pub async fn update(&self, id: &str, draft: &BatchClassDraft) -> Result<BatchClass, ApiError> {
        let value = self
            .client
            .put(&format!("/batch-class/{id}"), ApiBody::Json(json!(draft)))
            .await?;
        let envelope: BatchClassEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("batch-class state poisoned")
            .updated(envelope.data.clone());
        Ok(envelope.data)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/batch-class/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("batch-class state poisoned")
            .removed(id);
        Ok(())
    }
}
