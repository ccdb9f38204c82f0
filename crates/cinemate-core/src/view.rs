use cinemate_client::{MovieCatalog, WatchlistStore};
use cinemate_models::{validate_movie_id, Feedback, MovieDetail, MovieId, StarRating, WatchlistEntry};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};
use crate::error::SyncError;
use crate::sync::WatchlistSync;

/// A watchlist entry with whatever detail the catalog could supply
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistRow {
    #[serde(flatten)]
    pub entry: WatchlistEntry,
    pub detail: Option<MovieDetail>,
}

impl WatchlistRow {
    pub fn title(&self) -> String {
        match &self.detail {
            Some(detail) => detail.title.clone(),
            None => format!("Movie {}", self.entry.movie_id),
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        self.detail.as_ref().and_then(MovieDetail::release_year)
    }
}

/// A movie's detail alongside its watchlist state
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub movie_id: MovieId,
    pub detail: MovieDetail,
    pub in_watchlist: bool,
    pub favourite: bool,
    pub user_rating: Option<StarRating>,
    pub feedback: Option<Feedback>,
}

/// Take a fresh snapshot and pair every entry with its movie detail
///
/// At most `concurrency` detail requests are in flight; rows come back in
/// watchlist order. A movie whose detail cannot be fetched still gets a row.
pub async fn watchlist_rows<S, C>(
    sync: &WatchlistSync<S>,
    catalog: &C,
    concurrency: usize,
) -> Result<Vec<WatchlistRow>, SyncError>
where
    S: WatchlistStore,
    C: MovieCatalog,
{
    let snapshot = sync.refresh().await?;
    let entries: Vec<WatchlistEntry> = snapshot.entries().cloned().collect();
    debug!(entries = entries.len(), concurrency, "Fetching watchlist details");

    let rows = stream::iter(entries)
        .map(|entry| async move {
            let detail = match catalog.movie_detail(entry.movie_id).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    warn!(movie_id = entry.movie_id, "Could not load movie details: {}", e);
                    None
                }
            };
            WatchlistRow { entry, detail }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Ok(rows)
}

/// Movie detail plus watchlist state, read from the same snapshot the list
/// view uses
pub async fn detail_view<S, C>(
    sync: &WatchlistSync<S>,
    catalog: &C,
    movie_id: MovieId,
) -> Result<DetailView, SyncError>
where
    S: WatchlistStore,
    C: MovieCatalog,
{
    let movie_id = validate_movie_id(movie_id)?;
    let detail = catalog.movie_detail(movie_id).await?;
    let entry = sync.entry(movie_id).await?;

    Ok(DetailView {
        movie_id,
        detail,
        in_watchlist: entry.is_some(),
        favourite: entry.as_ref().map_or(false, |e| e.favourite),
        user_rating: entry.as_ref().and_then(|e| e.user_rating),
        feedback: entry.and_then(|e| e.feedback),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use async_trait::async_trait;
    use cinemate_client::{ClientError, ClientResult};
    use cinemate_models::{MovieSummary, SearchQuery};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeCatalog {
        movies: HashMap<MovieId, MovieDetail>,
        lookups: AtomicUsize,
    }

    impl FakeCatalog {
        fn with(titles: &[(MovieId, &str)]) -> Self {
            let movies = titles
                .iter()
                .map(|(id, title)| {
                    let detail = MovieDetail {
                        title: title.to_string(),
                        overview: None,
                        release_date: Some("1999-03-30".to_string()),
                        rating: Some(8.0),
                        poster_url: None,
                        cast: Vec::new(),
                        trailer: None,
                    };
                    (*id, detail)
                })
                .collect();
            Self {
                movies,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl MovieCatalog for FakeCatalog {
        async fn movie_detail(&self, movie_id: MovieId) -> ClientResult<MovieDetail> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.movies
                .get(&movie_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound {
                    message: format!("Movie with ID {} not found", movie_id),
                })
        }

        async fn search(&self, _query: &SearchQuery) -> ClientResult<Vec<MovieSummary>> {
            Ok(Vec::new())
        }

        async fn trending(&self) -> ClientResult<Vec<MovieSummary>> {
            Ok(Vec::new())
        }

        async fn recommendations(&self) -> ClientResult<Vec<MovieSummary>> {
            Ok(Vec::new())
        }
    }

    fn entries(ids: &[MovieId]) -> Vec<WatchlistEntry> {
        ids.iter().copied().map(WatchlistEntry::new).collect()
    }

    #[tokio::test]
    async fn test_rows_keep_order_and_tolerate_missing_detail() {
        let store = Arc::new(MemoryStore::with_entries(entries(&[603, 13, 27205])));
        let sync = WatchlistSync::new(store.clone());
        let catalog = FakeCatalog::with(&[(603, "The Matrix"), (27205, "Inception")]);

        let rows = watchlist_rows(&sync, &catalog, 2).await.unwrap();

        let titles: Vec<String> = rows.iter().map(WatchlistRow::title).collect();
        assert_eq!(titles, vec!["The Matrix", "Movie 13", "Inception"]);
        assert!(rows[1].detail.is_none());
        assert_eq!(rows[0].release_year(), Some(1999));
        assert_eq!(store.fetch_count(), 1);
        assert_eq!(catalog.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_renders() {
        let store = Arc::new(MemoryStore::with_entries(entries(&[603])));
        let sync = WatchlistSync::new(store);
        let catalog = FakeCatalog::with(&[(603, "The Matrix")]);

        let rows = watchlist_rows(&sync, &catalog, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_detail_view_agrees_with_list() {
        let store = Arc::new(MemoryStore::with_entries(entries(&[603])));
        let sync = WatchlistSync::new(store.clone());
        let catalog = FakeCatalog::with(&[(603, "The Matrix"), (550, "Fight Club")]);

        sync.toggle_favourite(603).await.unwrap();
        sync.set_rating(603, 5).await.unwrap();
        let rows = watchlist_rows(&sync, &catalog, 4).await.unwrap();

        let listed = detail_view(&sync, &catalog, 603).await.unwrap();
        assert!(listed.in_watchlist);
        assert_eq!(listed.favourite, rows[0].entry.favourite);
        assert_eq!(listed.user_rating, rows[0].entry.user_rating);

        let unlisted = detail_view(&sync, &catalog, 550).await.unwrap();
        assert!(!unlisted.in_watchlist);
        assert!(!unlisted.favourite);
        assert_eq!(unlisted.user_rating, None);

        // Both detail views were answered from the list's snapshot
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_detail_view_for_unknown_movie() {
        let sync = WatchlistSync::new(Arc::new(MemoryStore::new()));
        let catalog = FakeCatalog::default();

        let err = detail_view(&sync, &catalog, 1).await.unwrap_err();
        assert!(err.is_not_found());

        let err = detail_view(&sync, &catalog, 0).await.unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
    }
}
