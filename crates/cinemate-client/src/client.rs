use async_trait::async_trait;
use cinemate_config::ApiConfig;
use cinemate_models::{
    validate_movie_id, Feedback, MovieDetail, MovieId, MovieSummary, SearchQuery, StarRating, WatchlistEntry,
};
use reqwest::Client;
use std::sync::Arc;
use tracing::info;
use crate::api;
use crate::error::ClientResult;
use crate::traits::{FavouriteToggle, MovieCatalog, WatchlistStore};

/// reqwest-backed client for the catalog backend
#[derive(Clone)]
pub struct ApiClient {
    client: Arc<Client>,
    api: ApiConfig,
}

impl ApiClient {
    pub fn new(api: ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(api.user_agent.clone())
            .timeout(api.timeout())
            .build()?;

        info!(base_url = %api.base_url, timeout_secs = api.timeout_secs, "Created API client");

        Ok(Self {
            client: Arc::new(client),
            api,
        })
    }
}

#[async_trait]
impl WatchlistStore for ApiClient {
    async fn fetch_watchlist(&self) -> ClientResult<Vec<WatchlistEntry>> {
        api::get_watchlist(&self.client, &self.api).await
    }

    async fn add(&self, movie_id: MovieId) -> ClientResult<String> {
        let movie_id = validate_movie_id(movie_id)?;
        api::add_to_watchlist(&self.client, &self.api, movie_id).await
    }

    async fn remove(&self, movie_id: MovieId) -> ClientResult<String> {
        let movie_id = validate_movie_id(movie_id)?;
        api::remove_from_watchlist(&self.client, &self.api, movie_id).await
    }

    async fn toggle_favourite(&self, movie_id: MovieId) -> ClientResult<FavouriteToggle> {
        let movie_id = validate_movie_id(movie_id)?;
        api::toggle_favourite(&self.client, &self.api, movie_id).await
    }

    async fn set_rating(&self, movie_id: MovieId, rating: StarRating) -> ClientResult<String> {
        let movie_id = validate_movie_id(movie_id)?;
        api::set_rating(&self.client, &self.api, movie_id, rating).await
    }

    async fn submit_feedback(&self, movie_id: MovieId, feedback: Feedback) -> ClientResult<String> {
        let movie_id = validate_movie_id(movie_id)?;
        api::set_feedback(&self.client, &self.api, movie_id, feedback).await
    }
}

#[async_trait]
impl MovieCatalog for ApiClient {
    async fn movie_detail(&self, movie_id: MovieId) -> ClientResult<MovieDetail> {
        let movie_id = validate_movie_id(movie_id)?;
        api::get_movie_detail(&self.client, &self.api, movie_id).await
    }

    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<MovieSummary>> {
        query.validate()?;
        api::search_movies(&self.client, &self.api, query).await
    }

    async fn trending(&self) -> ClientResult<Vec<MovieSummary>> {
        api::get_trending(&self.client, &self.api).await
    }

    async fn recommendations(&self) -> ClientResult<Vec<MovieSummary>> {
        api::get_recommendations(&self.client, &self.api).await
    }
}
