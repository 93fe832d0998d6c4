use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::Location;
use crate::store::{CollectionState, Sequencer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
struct LocationEnvelope {
    location: Location,
}

pub struct LocationStore {
    client: ApiClient,
    state: Mutex<CollectionState<Location>>,
    fetches: Sequencer,
}

impl LocationStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Location> {
        self.state.lock().expect("location state poisoned").clone()
    }

    /// The list endpoint answers with a bare array.
    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("location state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/locations", Vec::new())
            .await
            .and_then(from_value::<Vec<Location>>);
        let mut state = self.state.lock().expect("location state poisoned");
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

    pub async fn create(&self, draft: &LocationDraft) -> Result<Location, ApiError> {
        let value = self
            .client
            .post("/location", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: LocationEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("location state poisoned")
            .created(envelope.location.clone());
        Ok(envelope.location)
    }

    pub async fn update(&self, id: &str, draft: &LocationDraft) -> Result<Location, ApiError> {
        let value = self
            .client
            .put(&format!("/location/{id}"), ApiBody::Json(json!(draft)))
            .await?;
        let envelope: LocationEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("location state poisoned")
            .updated(envelope.location.clone());
        Ok(envelope.location)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/location/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("location state poisoned")
            .removed(id);
        Ok(())
    }
}
