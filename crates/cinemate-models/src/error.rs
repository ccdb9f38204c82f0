use thiserror::Error;

/// Input rejected on the client before any request is sent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("movie id must be a positive integer")]
    InvalidMovieId,

    #[error("rating must be between 1 and 5 stars, got {0}")]
    RatingOutOfRange(i64),

    #[error("please select a rating before submitting")]
    NoRatingSelected,

    #[error("please enter a movie name or at least one filter")]
    EmptySearch,

    #[error("minimum rating must be between 0 and 10, got {0}")]
    MinRatingOutOfRange(f32),

    #[error("unknown feedback '{0}' (expected like, not_interested or rated_1..rated_5)")]
    UnknownFeedback(String),

    #[error("unknown sort order '{0}'")]
    UnknownSortOrder(String),
}
