use thiserror::Error;

/// Errors raised by [`crate::ApiClient`] and surfaced through the store.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with `success: false` or a non-2xx status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("response carried no data")]
    MissingData,
}

impl ClientError {
    /// Server-provided message when there is one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
