use thiserror::Error;

/// Normalized failure surface for every backend call. Stores keep the
/// message of a failed fetch; mutation failures travel back to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No usable response came back: refused connection, timeout, or a
    /// transport-level failure inside the HTTP client.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status. `message` is the
    /// server's own message when it sent one.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 401/403. Pages route to the login or unauthorized view instead of
    /// rendering this inline, no matter which store saw it.
    #[error("unauthorized")]
    Unauthorized,

    /// 404 on a fetch or mutation target. Local state is left alone.
    #[error("{0}")]
    NotFound(String),

    /// A 2xx response whose body did not match the expected envelope.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized,
            404 => ApiError::NotFound(
                message.unwrap_or_else(|| "resource not found".to_string()),
            ),
            _ => ApiError::Rejected {
                status,
                message: message
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            },
        }
    }

    /// Stable code used in sidecar error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "transport",
            ApiError::Rejected { .. } => "rejected",
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Decode(_) => "bad_response",
        }
    }
}
