use cinemate_client::{ClientError, WatchlistStore};
use cinemate_models::{
    validate_movie_id, Feedback, MovieId, StarRating, ValidationError, WatchlistEntry,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};
use crate::error::SyncError;
use crate::events::{Operation, WatchlistEvent};
use crate::snapshot::WatchlistSnapshot;

/// Events buffered per subscriber before slow receivers start lagging
const EVENT_CAPACITY: usize = 64;

/// Fetches a refresh makes before giving up on installing a snapshot while
/// mutations keep landing
const MAX_REFRESH_ATTEMPTS: usize = 3;

/// Keeps a local view of the watchlist truthful against the remote store
///
/// Mutations go straight to the store; the local snapshot is only touched
/// once the store has answered. Queries are served from a snapshot fetched
/// lazily on first use and reused until [`WatchlistSync::refresh`].
pub struct WatchlistSync<S> {
    store: Arc<S>,
    snapshot: RwLock<Option<WatchlistSnapshot>>,
    /// Bumped by every confirmed mutation; a fetch that started under an
    /// older value may predate the mutation and is not installed
    generation: AtomicU64,
    events: broadcast::Sender<WatchlistEvent>,
}

impl<S: WatchlistStore> WatchlistSync<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            snapshot: RwLock::new(None),
            generation: AtomicU64::new(0),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WatchlistEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: WatchlistEvent) {
        // Err only means nobody is listening
        let _ = self.events.send(event);
    }

    /// Refetch the full list and replace the snapshot
    ///
    /// A fetch overtaken by a confirmed mutation is fetched again rather than
    /// installed over it. If mutations keep landing, the last fetch is
    /// returned but the stored snapshot is left to the mutations.
    pub async fn refresh(&self) -> Result<WatchlistSnapshot, SyncError> {
        let mut attempt = 1;
        loop {
            let generation = self.generation.load(Ordering::SeqCst);
            let entries = match self.store.fetch_watchlist().await {
                Ok(entries) => entries,
                Err(e) => return Err(self.fail(None, Operation::Refresh, e).await),
            };
            let snapshot = WatchlistSnapshot::from_entries(entries);

            {
                let mut current = self.snapshot.write().await;
                if self.generation.load(Ordering::SeqCst) == generation {
                    *current = Some(snapshot.clone());
                    debug!(entries = snapshot.len(), "Watchlist snapshot rebuilt");
                    drop(current);
                    self.publish(WatchlistEvent::Refreshed {
                        entries: snapshot.len(),
                    });
                    return Ok(snapshot);
                }
            }

            if attempt >= MAX_REFRESH_ATTEMPTS {
                warn!(attempt, "Watchlist kept changing during refresh, snapshot not replaced");
                return Ok(snapshot);
            }
            debug!(attempt, "Watchlist changed while fetching, fetching again");
            attempt += 1;
        }
    }

    /// Current snapshot, fetching it if none has been taken yet
    pub async fn snapshot(&self) -> Result<WatchlistSnapshot, SyncError> {
        self.read(WatchlistSnapshot::clone).await
    }

    async fn read<R, F>(&self, f: F) -> Result<R, SyncError>
    where
        F: FnOnce(&WatchlistSnapshot) -> R,
    {
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = guard.as_ref() {
                return Ok(f(snapshot));
            }
        }
        let snapshot = self.refresh().await?;
        Ok(f(&snapshot))
    }

    /// Write access for recording a change the store has confirmed
    async fn confirmed(&self) -> RwLockWriteGuard<'_, Option<WatchlistSnapshot>> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.snapshot.write().await
    }

    /// Apply a confirmed change to one entry
    ///
    /// An entry the snapshot has never seen exists at the store with fields
    /// only the store knows, so the snapshot is dropped instead of guessed.
    async fn update_entry<F>(&self, movie_id: MovieId, f: F)
    where
        F: FnOnce(&mut WatchlistEntry),
    {
        let mut snapshot = self.confirmed().await;
        let known = snapshot.as_mut().map_or(true, |s| s.update(movie_id, f));
        if !known {
            debug!(movie_id, "Entry missing from snapshot, dropping it");
            *snapshot = None;
        }
    }

    /// Apply a confirmed change to the snapshot, if one has been taken.
    /// Without a snapshot the next query fetches the store's state anyway.
    async fn apply<F>(&self, f: F)
    where
        F: FnOnce(&mut WatchlistSnapshot),
    {
        if let Some(snapshot) = self.confirmed().await.as_mut() {
            f(snapshot);
        }
    }

    pub async fn query_membership(&self, movie_id: MovieId) -> Result<bool, SyncError> {
        self.read(|s| s.is_member(movie_id)).await
    }

    pub async fn query_favourite(&self, movie_id: MovieId) -> Result<bool, SyncError> {
        self.read(|s| s.is_favourite(movie_id)).await
    }

    pub async fn query_rating(&self, movie_id: MovieId) -> Result<Option<StarRating>, SyncError> {
        self.read(|s| s.rating(movie_id)).await
    }

    pub async fn entry(&self, movie_id: MovieId) -> Result<Option<WatchlistEntry>, SyncError> {
        self.read(|s| s.get(movie_id).cloned()).await
    }

    /// Add a movie. Adding a movie that is already listed keeps its entry.
    ///
    /// A movie the snapshot does not know may still be listed at the store
    /// with its own favourite and rating, so the snapshot is dropped and the
    /// next query fetches the real entry.
    pub async fn add(&self, movie_id: MovieId) -> Result<String, SyncError> {
        let movie_id = self.validated(movie_id, Operation::Add)?;
        let message = match self.store.add(movie_id).await {
            Ok(message) => message,
            Err(e) => return Err(self.fail(Some(movie_id), Operation::Add, e).await),
        };

        self.update_entry(movie_id, |_| {}).await;
        info!(movie_id, operation = "add", "{}", message);
        self.publish(WatchlistEvent::Added { movie_id });
        Ok(message)
    }

    pub async fn remove(&self, movie_id: MovieId) -> Result<String, SyncError> {
        let movie_id = self.validated(movie_id, Operation::Remove)?;
        let message = match self.store.remove(movie_id).await {
            Ok(message) => message,
            Err(e) => return Err(self.fail(Some(movie_id), Operation::Remove, e).await),
        };

        self.apply(|s| {
            s.remove(movie_id);
        })
        .await;
        info!(movie_id, operation = "remove", "{}", message);
        self.publish(WatchlistEvent::Removed { movie_id });
        Ok(message)
    }

    /// Flip the favourite flag and return the value the store settled on
    ///
    /// The local state follows the store's echo, never a local flip, so two
    /// racing toggles end up wherever the store's last write left them.
    pub async fn toggle_favourite(&self, movie_id: MovieId) -> Result<bool, SyncError> {
        let movie_id = self.validated(movie_id, Operation::ToggleFavourite)?;
        let toggle = match self.store.toggle_favourite(movie_id).await {
            Ok(toggle) => toggle,
            Err(e) => return Err(self.fail(Some(movie_id), Operation::ToggleFavourite, e).await),
        };

        let favourite = toggle.favourite;
        self.update_entry(movie_id, |e| e.favourite = favourite).await;
        info!(movie_id, operation = "toggle_favourite", favourite, "Favourite updated");
        self.publish(WatchlistEvent::FavouriteChanged { movie_id, favourite });
        Ok(favourite)
    }

    /// Rate a listed movie 1 to 5 stars
    ///
    /// Out-of-range values fail before anything is sent.
    pub async fn set_rating(&self, movie_id: MovieId, stars: i64) -> Result<String, SyncError> {
        let movie_id = self.validated(movie_id, Operation::SetRating)?;
        let rating = StarRating::new(stars).map_err(|e| self.rejected(Some(movie_id), Operation::SetRating, e))?;
        self.rate(movie_id, rating).await
    }

    pub async fn rate(&self, movie_id: MovieId, rating: StarRating) -> Result<String, SyncError> {
        let movie_id = self.validated(movie_id, Operation::SetRating)?;
        let message = match self.store.set_rating(movie_id, rating).await {
            Ok(message) => message,
            Err(e) => return Err(self.fail(Some(movie_id), Operation::SetRating, e).await),
        };

        self.update_entry(movie_id, |e| e.user_rating = Some(rating)).await;
        info!(movie_id, operation = "set_rating", rating = rating.stars(), "{}", message);
        self.publish(WatchlistEvent::Rated { movie_id, rating });
        Ok(message)
    }

    /// Record recommendation feedback on a listed movie
    pub async fn submit_feedback(&self, movie_id: MovieId, feedback: Feedback) -> Result<String, SyncError> {
        let movie_id = self.validated(movie_id, Operation::SubmitFeedback)?;
        let message = match self.store.submit_feedback(movie_id, feedback).await {
            Ok(message) => message,
            Err(e) => return Err(self.fail(Some(movie_id), Operation::SubmitFeedback, e).await),
        };

        self.update_entry(movie_id, |e| e.feedback = Some(feedback)).await;
        info!(movie_id, operation = "submit_feedback", feedback = %feedback, "{}", message);
        self.publish(WatchlistEvent::FeedbackRecorded { movie_id, feedback });
        Ok(message)
    }

    fn validated(&self, movie_id: MovieId, operation: Operation) -> Result<MovieId, SyncError> {
        validate_movie_id(movie_id).map_err(|e| self.rejected(Some(movie_id), operation, e))
    }

    /// Local validation failure; nothing reached the store so nothing is published
    fn rejected(&self, movie_id: Option<MovieId>, operation: Operation, err: ValidationError) -> SyncError {
        warn!(movie_id, operation = operation.as_str(), "Rejected before sending: {}", err);
        SyncError::Validation(err)
    }

    /// Log, publish and classify a store failure
    async fn fail(&self, movie_id: Option<MovieId>, operation: Operation, err: ClientError) -> SyncError {
        let err = match (movie_id, err) {
            (Some(id), e) if e.is_not_found() && operation.requires_entry() => {
                // The store no longer has it, whatever the snapshot said
                self.apply(|s| {
                    s.remove(id);
                })
                .await;
                SyncError::NotInWatchlist(id)
            }
            (_, e) => SyncError::from(e),
        };

        if let SyncError::Validation(e) = err {
            return self.rejected(movie_id, operation, e);
        }

        warn!(
            movie_id,
            operation = operation.as_str(),
            retryable = err.is_retryable(),
            "Watchlist operation failed: {}",
            err
        );
        self.publish(WatchlistEvent::Failed {
            movie_id,
            operation,
            message: err.to_string(),
        });
        err
    }
}
