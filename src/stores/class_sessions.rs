use std::sync::Mutex;

use serde_json::Value;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::ClassSession;
use crate::store::{CollectionState, Sequencer};

/// One store for the class-session resource. Mutations patch the cache
/// in place; pages re-fetch when they want server ordering back.
pub struct ClassSessionStore {
    client: ApiClient,
    state: Mutex<CollectionState<ClassSession>>,
    selected: Mutex<Option<ClassSession>>,
    fetches: Sequencer,
}

impl ClassSessionStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            selected: Mutex::new(None),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<ClassSession> {
        self.state
            .lock()
            .expect("class-session state poisoned")
            .clone()
    }

    pub fn selected(&self) -> Option<ClassSession> {
        self.selected
            .lock()
            .expect("class-session selection poisoned")
            .clone()
    }

    pub fn clear_selected(&self) {
        *self
            .selected
            .lock()
            .expect("class-session selection poisoned") = None;
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("class-session state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/class-sessions", Vec::new())
            .await
            .and_then(from_value::<Vec<ClassSession>>);
        let mut state = self.state.lock().expect("class-session state poisoned");
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

    /// Loads one session into the `selected` slot for the detail view.
    pub async fn fetch_by_id(&self, id: &str) -> Result<ClassSession, ApiError> {
        let value = self
            .client
            .get(&format!("/class-sessions/{id}"), Vec::new())
            .await?;
        let session: ClassSession = from_value(value)?;
        *self
            .selected
            .lock()
            .expect("class-session selection poisoned") = Some(session.clone());
        Ok(session)
    }

    /// `payload` comes pre-shaped by `views::SessionDraft`, which keeps
    /// only the recurrence fields for the chosen session type.
    pub async fn create(&self, payload: Value) -> Result<ClassSession, ApiError> {
        let value = self
            .client
            .post("/class-sessions", ApiBody::Json(payload))
            .await?;
        let session: ClassSession = from_value(value)?;
        self.state
            .lock()
            .expect("class-session state poisoned")
            .created(session.clone());
        Ok(session)
    }

    pub async fn update(&self, id: &str, payload: Value) -> Result<ClassSession, ApiError> {
        let value = self
            .client
            .put(&format!("/class-sessions/{id}"), ApiBody::Json(payload))
            .await?;
        let session: ClassSession = from_value(value)?;
        self.state
            .lock()
            .expect("class-session state poisoned")
            .updated(session.clone());
        Ok(session)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/class-sessions/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("class-session state poisoned")
            .removed(id);
        Ok(())
    }
}
