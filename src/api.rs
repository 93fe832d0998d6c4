use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::session::SessionHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

/// A file picked in an upload form (student photo, institute logo).
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Reads a local file the UI shell pointed at. Content type is
    /// guessed from the extension; the backend re-validates anyway.
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = match path.extension().and_then(|e| e.to_str()) {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };
        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            bytes,
        })
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text { name: String, value: String },
    File { name: String, file: FileUpload },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Multipart(Vec<Part>),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub verb: Verb,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<ApiBody>,
    pub bearer: Option<String>,
}

/// Status and decoded JSON body, before any envelope interpretation.
/// Non-JSON bodies decode to `Null` rather than failing the transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

/// Effect boundary between the stores and the network. Production wraps
/// `reqwest`; tests substitute a scripted in-memory implementation.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.verb {
            Verb::Get => self.http.get(&url),
            Verb::Post => self.http.post(&url),
            Verb::Put => self.http.put(&url),
            Verb::Delete => self.http.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            Some(ApiBody::Json(value)) => builder.json(&value),
            Some(ApiBody::Multipart(parts)) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match part {
                        Part::Text { name, value } => form.text(name, value),
                        Part::File { name, file } => {
                            let piece = reqwest::multipart::Part::bytes(file.bytes)
                                .file_name(file.file_name)
                                .mime_str(&file.content_type)
                                .map_err(|e| ApiError::Transport(e.to_string()))?;
                            form.part(name, piece)
                        }
                    };
                }
                builder.multipart(form)
            }
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(RawResponse { status, body })
    }
}

/// Single chokepoint for outgoing calls: attaches the bearer token when
/// the session slice holds one, and normalizes non-2xx responses into
/// the `ApiError` taxonomy. Never touches store state itself.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn Backend>,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(backend: Arc<dyn Backend>, session: SessionHandle) -> Self {
        Self { backend, session }
    }

    pub async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, ApiError> {
        self.run(Verb::Get, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: ApiBody) -> Result<Value, ApiError> {
        self.run(Verb::Post, path, Vec::new(), Some(body)).await
    }

    pub async fn put(&self, path: &str, body: ApiBody) -> Result<Value, ApiError> {
        self.run(Verb::Put, path, Vec::new(), Some(body)).await
    }

    /// The batch-removal endpoint wants a JSON body on DELETE, so the
    /// body stays optional here rather than being forbidden.
    pub async fn delete(
        &self,
        path: &str,
        body: Option<ApiBody>,
    ) -> Result<Value, ApiError> {
        self.run(Verb::Delete, path, Vec::new(), body).await
    }

    async fn run(
        &self,
        verb: Verb,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<ApiBody>,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest {
            verb,
            path: path.to_string(),
            query,
            body,
            bearer: self.session.token(),
        };
        let raw = self.backend.execute(request).await?;
        if (200..300).contains(&raw.status) {
            return Ok(raw.body);
        }
        let message = raw
            .body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Err(ApiError::from_status(raw.status, message))
    }
}

/// Decodes a response body into a typed envelope.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
