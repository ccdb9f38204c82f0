use async_trait::async_trait;
use cinemate_models::{Feedback, MovieDetail, MovieId, MovieSummary, SearchQuery, StarRating, WatchlistEntry};
use serde::{Deserialize, Serialize};
use crate::error::ClientResult;

/// Server echo of a favourite toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavouriteToggle {
    pub favourite: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// The remote watchlist store
///
/// Contract expected of implementations: `add` is idempotent (never creates
/// a second entry for one movie), `remove` of a non-member succeeds, and
/// `toggle_favourite` / `set_rating` / `submit_feedback` on a non-member fail
/// with `ClientError::NotFound`.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    async fn fetch_watchlist(&self) -> ClientResult<Vec<WatchlistEntry>>;

    async fn add(&self, movie_id: MovieId) -> ClientResult<String>;
    async fn remove(&self, movie_id: MovieId) -> ClientResult<String>;
    async fn toggle_favourite(&self, movie_id: MovieId) -> ClientResult<FavouriteToggle>;
    async fn set_rating(&self, movie_id: MovieId, rating: StarRating) -> ClientResult<String>;
    async fn submit_feedback(&self, movie_id: MovieId, feedback: Feedback) -> ClientResult<String>;
}

/// Read-only catalog endpoints
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn movie_detail(&self, movie_id: MovieId) -> ClientResult<MovieDetail>;
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<MovieSummary>>;
    async fn trending(&self) -> ClientResult<Vec<MovieSummary>>;
    async fn recommendations(&self) -> ClientResult<Vec<MovieSummary>>;
}
