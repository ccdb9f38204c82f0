use async_trait::async_trait;
use cinemate_client::{ClientError, ClientResult, FavouriteToggle, WatchlistStore};
use cinemate_models::{validate_movie_id, Feedback, MovieId, StarRating, WatchlistEntry};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Watchlist store held in process memory
///
/// Behaves like the backend: `add` is idempotent, removing a non-member
/// succeeds, and entry updates on a non-member are 404s. Every request is
/// handled under one lock, so concurrent callers are serialised the way the
/// backend's database serialises them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<WatchlistEntry>>,
    fetches: AtomicUsize,
    requests: AtomicUsize,
}

fn missing() -> ClientError {
    ClientError::NotFound {
        message: "Movie not found in watchlist".to_string(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<WatchlistEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    pub async fn entries(&self) -> Vec<WatchlistEntry> {
        self.entries.lock().await.clone()
    }

    /// Full-list fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Requests of any kind served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn update<T, F>(&self, movie_id: MovieId, f: F) -> ClientResult<T>
    where
        T: Send,
        F: FnOnce(&mut WatchlistEntry) -> T + Send,
    {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let movie_id = validate_movie_id(movie_id)?;
        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.movie_id == movie_id)
            .ok_or_else(missing)?;
        Ok(f(entry))
    }
}

#[async_trait]
impl WatchlistStore for MemoryStore {
    async fn fetch_watchlist(&self) -> ClientResult<Vec<WatchlistEntry>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().await.clone())
    }

    async fn add(&self, movie_id: MovieId) -> ClientResult<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let movie_id = validate_movie_id(movie_id)?;
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|e| e.movie_id == movie_id) {
            return Ok(format!("Movie {} is already in the watchlist.", movie_id));
        }
        entries.push(WatchlistEntry::new(movie_id));
        Ok(format!("Movie {} added to watchlist!", movie_id))
    }

    async fn remove(&self, movie_id: MovieId) -> ClientResult<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let movie_id = validate_movie_id(movie_id)?;
        self.entries.lock().await.retain(|e| e.movie_id != movie_id);
        Ok(format!("Movie {} removed from watchlist!", movie_id))
    }

    async fn toggle_favourite(&self, movie_id: MovieId) -> ClientResult<FavouriteToggle> {
        let favourite = self
            .update(movie_id, |e| {
                e.favourite = !e.favourite;
                e.favourite
            })
            .await?;
        Ok(FavouriteToggle {
            favourite,
            message: None,
        })
    }

    async fn set_rating(&self, movie_id: MovieId, rating: StarRating) -> ClientResult<String> {
        self.update(movie_id, |e| e.user_rating = Some(rating)).await?;
        Ok(format!("Rating for movie {} updated to {}.", movie_id, rating.stars()))
    }

    async fn submit_feedback(&self, movie_id: MovieId, feedback: Feedback) -> ClientResult<String> {
        self.update(movie_id, |e| e.feedback = Some(feedback)).await?;
        Ok(format!("Feedback for movie {} updated to {}.", movie_id, feedback))
    }
}
