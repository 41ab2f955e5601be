pub mod facilitator;
pub mod paid_http;

use thiserror::Error;

use crate::domain::PaymentError;
use crate::signing::SigningError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("upstream status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid upstream response: {0}")]
    Decode(String),
    #[error("invalid resource: {0}")]
    InvalidResource(String),
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl ClientError {
    /// Transport failures and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}
