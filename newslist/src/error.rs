use thiserror::Error;

/// Why a news fetch did not produce a display list.
///
/// Variants carry owned strings rather than the underlying `reqwest`/`serde_json`
/// errors so the error can be cloned into the component state and shown to every
/// observer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, reset...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The body was not a JSON array of valid news records.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Short machine-friendly label, used in logs and the status endpoint.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Timeout(_) => "timeout",
            FetchError::Status { .. } => "status",
            FetchError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}
