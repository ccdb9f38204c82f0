use cinemate_models::ValidationError;
use thiserror::Error;

/// Failure talking to the catalog backend
///
/// Transport failures ("server unreachable") are kept apart from 404s
/// ("entry not found") so callers can react differently to each.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound { .. } => Some(404),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
