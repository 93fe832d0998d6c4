#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use mybuddyd::api::{ApiRequest, Backend, RawResponse, Verb};
use mybuddyd::app::App;
use mybuddyd::error::ApiError;

/// Scripted backend: canned replies keyed by "VERB path", and a log of
/// every request so tests can assert what actually went out (or that
/// nothing did). Multiple stubs for one key are consumed in order; the
/// last one sticks.
pub struct FakeBackend {
    replies: Mutex<HashMap<String, VecDeque<Result<RawResponse, ApiError>>>>,
    log: Mutex<Vec<ApiRequest>>,
}

fn key(verb: Verb, path: &str) -> String {
    format!("{} {}", verb.as_str(), path)
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn stub(&self, verb: Verb, path: &str, status: u16, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .entry(key(verb, path))
            .or_default()
            .push_back(Ok(RawResponse { status, body }));
    }

    pub fn stub_transport_error(&self, verb: Verb, path: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .entry(key(verb, path))
            .or_default()
            .push_back(Err(ApiError::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.log.lock().unwrap().push(request.clone());
        let lookup = key(request.verb, &request.path);
        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(&lookup)
            .ok_or_else(|| ApiError::Transport(format!("no stub for {lookup}")))?;
        if queue.len() > 1 {
            queue.pop_front().expect("non-empty queue")
        } else {
            queue
                .front()
                .cloned()
                .ok_or_else(|| ApiError::Transport(format!("no stub for {lookup}")))?
        }
    }
}

/// An app over the fake backend with no session persistence.
pub fn app_over(backend: &Arc<FakeBackend>) -> App {
    App::open(backend.clone(), None)
}

pub fn student_json(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "email": format!("{id}@example.com") })
}

pub fn teacher_json(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "gender": "female", "phone": "98400" })
}

pub fn subject_json(id: &str, name: &str, fee: f64) -> Value {
    json!({ "_id": id, "name": name, "subjectFee": fee })
}

pub fn batch_json(id: &str, name: &str) -> Value {
    json!({ "_id": id, "batchName": name })
}

pub fn login_grant(token: &str, role: &str) -> Value {
    json!({
        "user": { "_id": "u1", "name": "Admin", "email": "admin@example.com" },
        "token": token,
        "role": role,
    })
}
