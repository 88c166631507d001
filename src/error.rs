// Error types returned by the library. The binary wraps these in
// `anyhow` at the boundary; nothing in here is retried or recovered.

use std::fmt;

use thiserror::Error;

/// An error the moderation service reported itself through the
/// `rsp.err` envelope. The code is the service's own identifier and is
/// kept as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationServiceError {
    pub message: String,
    pub code: String,
}

impl fmt::Display for ModerationServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for ModerationServiceError {}

#[derive(Debug, Error)]
pub enum Error {
    /// Connection failure or a non-2xx HTTP status.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed response envelope: {0}")]
    Envelope(String),

    #[error("response is missing field `{0}`")]
    MissingField(String),

    #[error("response field `{field}` has unusable value {value:?}")]
    InvalidField { field: String, value: String },

    #[error(transparent)]
    Service(#[from] ModerationServiceError),
}

pub type Result<T> = std::result::Result<T, Error>;
