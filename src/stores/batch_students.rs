use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::BatchStudent;
use crate::store::{CollectionState, Sequencer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnrolmentError {
    #[error("batch and student are required")]
    MissingParties,
    #[error("number of installments must be at least 1")]
    NoInstallments,
}

/// Enrolment form. `number_of_installments` starts at 1 so the default
/// draft is already valid; validation checks this field, not a key the
/// form never held.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentDraft {
    pub batch_id: String,
    pub student_id: String,
    #[serde(default)]
    pub installment_type: String,
    #[serde(default = "EnrolmentDraft::one_installment")]
    pub number_of_installments: u32,
}

impl EnrolmentDraft {
    fn one_installment() -> u32 {
        1
    }

    pub fn validate(&self) -> Result<(), EnrolmentError> {
        if self.batch_id.is_empty() || self.student_id.is_empty() {
            return Err(EnrolmentError::MissingParties);
        }
        if self.number_of_installments < 1 {
            return Err(EnrolmentError::NoInstallments);
        }
        Ok(())
    }
}

impl Default for EnrolmentDraft {
    fn default() -> Self {
        Self {
            batch_id: String::new(),
            student_id: String::new(),
            installment_type: String::new(),
            number_of_installments: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchStudentList {
    data: Vec<BatchStudent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchStudentEnvelope {
    batch_student: BatchStudent,
}

/// Enrolments are append-only from the client's point of view: list and
/// create are the only operations the backend offers.
pub struct BatchStudentStore {
    client: ApiClient,
    state: Mutex<CollectionState<BatchStudent>>,
    fetches: Sequencer,
}

impl BatchStudentStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CollectionState::default()),
            fetches: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<BatchStudent> {
        self.state
            .lock()
            .expect("batch-student state poisoned")
            .clone()
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let seq = self.fetches.next();
        self.state
            .lock()
            .expect("batch-student state poisoned")
            .fetch_started(seq);

        let outcome = self
            .client
            .get("/batch-students", Vec::new())
            .await
            .and_then(from_value::<BatchStudentList>);
        let mut state = self.state.lock().expect("batch-student state poisoned");
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

    /// Rejects locally before the network when the draft is invalid, so
    /// the form keeps its state and the user corrects it.
    pub async fn create(&self, draft: &EnrolmentDraft) -> Result<BatchStudent, ApiError> {
        if let Err(e) = draft.validate() {
            return Err(ApiError::Rejected {
                status: 400,
                message: e.to_string(),
            });
        }
        let value = self
            .client
            .post("/batch-student", ApiBody::Json(json!(draft)))
            .await?;
        let envelope: BatchStudentEnvelope = from_value(value)?;
        self.state
            .lock()
            .expect("batch-student state poisoned")
            .created(envelope.batch_student.clone());
        Ok(envelope.batch_student)
    }
}
