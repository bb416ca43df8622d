// Error types shared by the client, the CLI and the example workflow.
// Library code returns `ApiError`; the binaries wrap it in `anyhow` and
// map it back to an exit code at the top level (see `cli::exit_code`).

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server answered with a non-success status. `body` holds the
    /// parsed JSON error payload when the server sent one.
    #[error("API request failed with status {status}: {detail}")]
    Status {
        status: u16,
        detail: String,
        body: Option<Value>,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Build a `Status` error from a failed response body. JSON bodies
    /// contribute their `error`/`message` field (or the whole document) to
    /// the detail; anything else falls back to the raw text.
    pub fn from_status(status: u16, text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(body) => {
                let detail = ["error", "message"]
                    .iter()
                    .find_map(|key| body.get(*key).and_then(Value::as_str))
                    .map(str::to_string)
                    .unwrap_or_else(|| body.to_string());
                ApiError::Status {
                    status,
                    detail,
                    body: Some(body),
                }
            }
            Err(_) => ApiError::Status {
                status,
                detail: if text.is_empty() {
                    "<empty response body>".to_string()
                } else {
                    text.to_string()
                },
                body: None,
            },
        }
    }
}
