use std::sync::Mutex;

use serde::Deserialize;

use crate::api::{from_value, ApiBody, ApiClient, FileUpload, Part};
use crate::error::ApiError;
use crate::model::Teacher;
use crate::store::{CollectionState, Sequencer};

/// Faculty form; the photo is a file part when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDraft {
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(skip)]
    pub photo: Option<FileUpload>,
}

impl TeacherDraft {
    fn to_parts(&self) -> Vec<Part> {
        let mut parts = Vec::new();
        let mut text = |name: &str, value: &str| {
            if !value.is_empty() {
                parts.push(Part::Text {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        };
        text("name", &self.name);
        text("subject", &self.subject);
        text("gender", &self.gender);
        text("phone", &self.phone);
        if let Some(photo) = &self.photo {
            parts.push(Part::File {
                name: "photo".to_string(),
                file: photo.clone(),
            });
        }
        parts
    }
}

/// List responses arrive as `{success, data}`; single records as `{data}`.
#[derive(Debug, Deserialize)]
struct TeacherList {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    data: Vec<Teacher>,
}

#[derive(Debug, Deserialize)]
struct TeacherEnvelope {
    data: Teacher,
}

pub struct TeacherStore {
    client: ApiClient,
    state: Mutex<CollectionState<Teacher>>,
    fetches: Sequencer,
}

impl TeacherStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Teacher> {
        self.state.lock().expect("teacher state poisoned").clone()
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("teacher state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/teachers", Vec::new())
            .await
            .and_then(from_value::<TeacherList>);
        let mut state = self.state.lock().expect("teacher state poisoned");
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

    /// Single-record lookup used by the edit page; not cached.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Teacher, ApiError> {
        let value = self.client.get(&format!("/teacher/{id}"), Vec::new()).await?;
        let envelope: TeacherEnvelope = from_value(value)?;
        Ok(envelope.data)
    }

    pub async fn create(&self, draft: &TeacherDraft) -> Result<Teacher, ApiError> {
        let value = self
            .client
            .post("/teacher", ApiBody::Multipart(draft.to_parts()))
            .await?;
        let envelope: TeacherEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("teacher state poisoned")
            .created(envelope.data.clone());
        Ok(envelope.data)
    }

    pub async fn update(&self, id: &str, draft: &TeacherDraft) -> Result<Teacher, ApiError> {
        let value = self
            .client
            .put(&format!("/teacher/{id}"), ApiBody::Multipart(draft.to_parts()))
            .await?;
        let envelope: TeacherEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("teacher state poisoned")
            .updated(envelope.data.clone());
        Ok(envelope.data)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/delete/teacher/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("teacher state poisoned")
            .removed(id);
        Ok(())
    }
}
