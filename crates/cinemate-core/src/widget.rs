use cinemate_client::WatchlistStore;
use cinemate_models::{MovieId, StarRating, ValidationError};
use crate::error::SyncError;
use crate::sync::WatchlistSync;

/// Star selector for one movie
///
/// Each widget owns its pending selection, so two open selectors never see
/// each other's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingWidget {
    movie_id: MovieId,
    selected: Option<StarRating>,
}

impl RatingWidget {
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            selected: None,
        }
    }

    /// Start from a rating the movie already has
    pub fn with_selection(movie_id: MovieId, selected: Option<StarRating>) -> Self {
        Self { movie_id, selected }
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    /// Select a star count. An invalid value leaves the previous selection alone.
    pub fn select(&mut self, stars: i64) -> Result<StarRating, ValidationError> {
        let rating = StarRating::new(stars)?;
        self.selected = Some(rating);
        Ok(rating)
    }

    pub fn selection(&self) -> Option<StarRating> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Whether star `position` (1-based) is lit under the current selection
    pub fn is_lit(&self, position: u8) -> bool {
        self.selected.map_or(false, |r| position >= 1 && position <= r.stars())
    }

    /// Send the selection to the store
    pub async fn submit<S: WatchlistStore>(&self, sync: &WatchlistSync<S>) -> Result<String, SyncError> {
        let rating = self.selected.ok_or(ValidationError::NoRatingSelected)?;
        sync.rate(self.movie_id, rating).await
    }
}
