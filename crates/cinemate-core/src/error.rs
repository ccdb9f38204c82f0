use cinemate_client::ClientError;
use cinemate_models::{MovieId, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store answered 404 for an operation that needs an existing entry
    #[error("movie {0} is not in the watchlist")]
    NotInWatchlist(MovieId),

    #[error(transparent)]
    Client(ClientError),
}

impl SyncError {
    /// Only transport failures are worth retrying as-is; everything else
    /// needs the caller to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Client(e) if e.is_transport())
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::NotInWatchlist(_) => true,
            SyncError::Client(e) => e.is_not_found(),
            SyncError::Validation(_) => false,
        }
    }
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(e) => SyncError::Validation(e),
            other => SyncError::Client(other),
        }
    }
}
