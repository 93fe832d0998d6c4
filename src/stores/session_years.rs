use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::SessionYear;
use crate::store::{CollectionState, Sequencer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionYearDraft {
    pub year_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionYearEnvelope {
    session_year: SessionYear,
}

pub struct SessionYearStore {
    client: ApiClient,
    state: Mutex<CollectionState<SessionYear>>,
    fetches: Sequencer,
}

impl SessionYearStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<SessionYear> {
        self.state
            .lock()
            .expect("session-year state poisoned")
            .clone()
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("session-year state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/session-years", Vec::new())
            .await
            .and_then(from_value::<Vec<SessionYear>>);
        let mut state = self.state.lock().expect("session-year state poisoned");
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

    pub async fn create(&self, draft: &SessionYearDraft) -> Result<SessionYear, ApiError> {
        let value = self
            .client
            .post("/create-session-year", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: SessionYearEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("session-year state poisoned")
            .created(envelope.session_year.clone());
        Ok(envelope.session_year)
    }

    pub async fn update(&self, id: &str, draft: &SessionYearDraft) -> Result<SessionYear, ApiError> {
        let value = self
            .client
            .put(
                &format!("/update-session-year/{id}"),
                ApiBody::Json(json!(draft)),
            )
            .await?;
        let envelope: SessionYearEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("session-year state poisoned")
            .updated(envelope.session_year.clone());
        Ok(envelope.session_year)
    }

    /// This endpoint echoes the removed record; removal keys off the id
    /// in the response.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let value = self
            .client
            .delete(&format!("/delete-session-year/{id}"), None)
            .await?;
        let removed_id = from_value::<SessionYearEnvelope>(value)
            .map(|envelope| envelope.session_year.id)
            .unwrap_or_else(|_| id.to_string());
        self.state
            .lock()
            .expect("session-year state poisoned")
            .removed(&removed_id);
        Ok(())
    }
}
