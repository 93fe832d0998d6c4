use std::sync::Mutex;

use serde::Deserialize;

use crate::api::{from_value, ApiBody, ApiClient, FileUpload, Part};
use crate::error::ApiError;
use crate::model::Institute;
use crate::store::{CollectionState, Pagination, Sequencer};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstituteQuery {
    #[serde(default = "InstituteQuery::first_page")]
    pub page: u64,
    #[serde(default)]
    pub search: Option<String>,
}

impl InstituteQuery {
    fn first_page() -> u64 {
        1
    }
}

impl Default for InstituteQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstituteDraft {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(skip)]
    pub logo: Option<FileUpload>,
}

impl InstituteDraft {
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
        text("address", &self.address);
        text("phone", &self.phone);
        if let Some(logo) = &self.logo {
            parts.push(Part::File {
                name: "logo".to_string(),
                file: logo.clone(),
            });
        }
        parts
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstitutePage {
    institutes: Vec<Institute>,
    #[serde(default)]
    total_pages: u64,
    #[serde(default)]
    current_page: u64,
}

#[derive(Debug, Deserialize)]
struct InstituteEnvelope {
    institute: Institute,
}

/// Delete responses echo the removed record; older backend builds sent
/// the id at the top level, so both spots are checked.
#[derive(Debug, Deserialize)]
struct DeleteEcho {
    #[serde(rename = "_id")]
    id: Option<String>,
    institute: Option<Institute>,
}

pub struct InstituteStore {
    client: ApiClient,
    state: Mutex<CollectionState<Institute>>,
    fetches: Sequencer,
}

impl InstituteStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Institute> {
        self.state.lock().expect("institute state poisoned").clone()
    }

    pub async fn fetch(&self, query: &InstituteQuery) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("institute state poisoned")
            .fetch_started(seq);

        let mut params = vec![("page".to_string(), query.page.max(1).to_string())];
        if let Some(search) = &query.search {
            params.push(("search".to_string(), search.clone()));
        }

        let outcome = self
            .client
            .get("/institutes", params)
            .await
            .and_then(from_value::<InstitutePage>);
        let mut state = self.state.lock().expect("institute state poisoned");
        match outcome {
            Ok(page) => {
                let pagination = Pagination {
                    current_page: page.current_page,
                    total_pages: page.total_pages,
                    total_records: 0,
                };
                state.fetch_succeeded(seq, page.institutes, Some(pagination));
                Ok(())
            }
            Err(e) => {
                state.fetch_failed(seq, e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: &InstituteDraft) -> Result<Institute, ApiError> {
        let value = self
            .client
            .post("/institute", ApiBody::Multipart(draft.to_parts()))
            .await?;
        let envelope: InstituteEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("institute state poisoned")
            .created(envelope.institute.clone());
        Ok(envelope.institute)
    }

    pub async fn update(&self, id: &str, draft: &InstituteDraft) -> Result<Institute, ApiError> {
        let value = self
            .client
            .put(&format!("/institute/{id}"), ApiBody::Multipart(draft.to_parts()))
            .await?;
        let envelope: InstituteEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("institute state poisoned")
            .updated(envelope.institute.clone());
        Ok(envelope.institute)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let value = self
            .client
            .delete(&format!("/institute/{id}"), None)
            .await?;
        let echoed = from_value::<DeleteEcho>(value)
            .ok()
            .and_then(|echo| echo.id.or(echo.institute.map(|i| i.id)));
        self.state
            .lock()
            .expect("institute state poisoned")
            .removed(echoed.as_deref().unwrap_or(id));
        Ok(())
    }
}
