use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::{from_value, ApiBody, ApiClient, FileUpload, Part};
use crate::error::ApiError;
use crate::model::Student;
use crate::store::{CollectionState, Pagination, Sequencer};

/// Server-side paging and free-text search for the student list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    #[serde(default = "StudentQuery::first_page")]
    pub page: u64,
    #[serde(default = "StudentQuery::default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

impl StudentQuery {
    fn first_page() -> u64 {
        1
    }

    fn default_limit() -> u64 {
        10
    }
}

impl Default for StudentQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            filter: None,
        }
    }
}

/// Admission/edit form. The photo rides along as a file part; everything
/// else is a text field, and empty fields are not sent at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub dob: Option<DateTime<Utc>>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    pub mother_name: String,
    #[serde(default)]
    pub father_phone: String,
    #[serde(default)]
    pub mother_phone: String,
    #[serde(skip)]
    pub photo: Option<FileUpload>,
}

impl StudentDraft {
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
        text("email", &self.email);
        text("gender", &self.gender);
        if let Some(dob) = &self.dob {
            text("dob", &dob.to_rfc3339());
        }
        text("address", &self.address);
        text("fatherName", &self.father_name);
        text("motherName", &self.mother_name);
        text("fatherPhone", &self.father_phone);
        text("motherPhone", &self.mother_phone);
        if let Some(photo) = &self.photo {
            parts.push(Part::File {
                name: "photo".to_string(),
                file: photo.clone(),
            });
        }
        parts
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentPage {
    students: Vec<Student>,
    #[serde(default)]
    total_pages: u64,
    #[serde(default)]
    current_page: u64,
}

#[derive(Debug, Deserialize)]
struct StudentEnvelope {
    student: Student,
}

pub struct StudentStore {
    client: ApiClient,
    state: Mutex<CollectionState<Student>>,
    fetches: Sequencer,
}

impl StudentStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Student> {
        self.state.lock().expect("student state poisoned").clone()
    }

    pub async fn fetch(&self, query: &StudentQuery) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("student state poisoned")
            .fetch_started(seq);

        let mut params = vec![
            ("page".to_string(), query.page.max(1).to_string()),
            ("limit".to_string(), query.limit.to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("search".to_string(), search.clone()));
        }
        if let Some(filter) = &query.filter {
            params.push(("filter".to_string(), filter.clone()));
        }

        let outcome = self
            .client
            .get("/students", params)
            .await
            .and_then(from_value::<StudentPage>);
        let mut state = self.state.lock().expect("student state poisoned");
        match outcome {
            Ok(page) => {
                let pagination = Pagination {
                    current_page: page.current_page,
                    total_pages: page.total_pages,
                    total_records: 0,
                };
                state.fetch_succeeded(seq, page.students, Some(pagination));
                Ok(())
            }
            Err(e) => {
                state.fetch_failed(seq, e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: &StudentDraft) -> Result<Student, ApiError> {
        let value = self
            .client
            .post("/student", ApiBody::Multipart(draft.to_parts()))
            .await?;
        let envelope: StudentEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("student state poisoned")
            .created(envelope.student.clone());
        Ok(envelope.student)
    }

    pub async fn update(&self, id: &str, draft: &StudentDraft) -> Result<Student, ApiError> {
        let value = self
            .client
            .put(
                &format!("/update/student/{id}"),
                ApiBody::Multipart(draft.to_parts()),
            )
            .await?;
        let envelope: StudentEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("student state poisoned")
            .updated(envelope.student.clone());
        Ok(envelope.student)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/delete/student/{id}"), None)
            .await?;
        self.state
            .lock()
            .expect("student state poisoned")
            .removed(id);
        Ok(())
    }
}
