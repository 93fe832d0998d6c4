use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::Batch;
use crate::store::{CollectionState, Sequencer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDraft {
    pub batch_name: String,
    #[serde(default)]
    pub session_year_id: String,
    #[serde(default)]
    pub location_id: String,
    #[serde(default)]
    pub course_id: String,
}

#[derive(Debug, Deserialize)]
struct BatchList {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    #[serde(default)]
    #[allow(dead_code)]
    message: Option<String>,
    data: Vec<Batch>,
}

#[derive(Debug, Deserialize)]
struct BatchEnvelope {
    batch: Batch,
}

/// Batches have no update endpoint; a cohort is created once and either
/// kept or deleted.
pub struct BatchStore {
    client: ApiClient,
    state: Mutex<CollectionState<Batch>>,
    fetches: Sequencer,
}

impl BatchStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Batch> {
        self.state.lock().expect("batch state poisoned").clone()
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("batch state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/batches", Vec::new())
            .await
            .and_then(from_value::<BatchList>);
        let mut state = self.state.lock().expect("batch state poisoned");
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

    pub async fn create(&self, draft: &BatchDraft) -> Result<Batch, ApiError> {
        let value = self
            .client
            .post("/create-batch", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: BatchEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("batch state poisoned")
            .created(envelope.batch.clone());
        Ok(envelope.batch)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/delete-batch/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("batch state poisoned")
            .removed(id);
        Ok(())
    }
}
