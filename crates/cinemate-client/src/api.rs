use cinemate_config::ApiConfig;
use cinemate_models::{Feedback, MovieDetail, MovieId, MovieSummary, SearchQuery, StarRating, WatchlistEntry};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::error::{ClientError, ClientResult};
use crate::traits::FavouriteToggle;

const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct WatchlistResponse {
    #[serde(default)]
    watchlist: Vec<WatchlistEntry>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

/// Older backends answered recommendations under "results"
#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default, alias = "results")]
    recommendations: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct MovieIdBody {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
}

#[derive(Debug, Serialize)]
struct RatingBody {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: StarRating,
}

#[derive(Debug, Serialize)]
struct FeedbackBody {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    feedback: Feedback,
}

/// Pull a human-readable message out of an error body
///
/// Prefers `{"error": ...}`, then `{"message": ...}`, then the raw text.
fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.error.or(parsed.message) {
            return Some(msg);
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_ERROR_BODY).collect())
}

/// Check the status and decode the body, mapping failures onto `ClientError`
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or_else(|| format!("{} failed", what));
        warn!(status = status.as_u16(), operation = what, "Backend returned an error: {}", message);
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { message });
        }
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

fn message_or(response: MessageResponse, fallback: impl FnOnce() -> String) -> String {
    response
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(fallback)
}

/// Fetch the full watchlist
pub async fn get_watchlist(client: &Client, api: &ApiConfig) -> ClientResult<Vec<WatchlistEntry>> {
    debug!("GET /api/watchlist");
    let response = client.get(api.endpoint("/api/watchlist")).send().await?;
    let parsed: WatchlistResponse = read_json(response, "fetch watchlist").await?;
    Ok(parsed.watchlist)
}

pub async fn add_to_watchlist(client: &Client, api: &ApiConfig, movie_id: MovieId) -> ClientResult<String> {
    debug!(movie_id, "POST /api/watchlist");
    let response = client
        .post(api.endpoint("/api/watchlist"))
        .json(&MovieIdBody { movie_id })
        .send()
        .await?;
    let parsed: MessageResponse = read_json(response, "add to watchlist").await?;
    Ok(message_or(parsed, || format!("Movie {} added to watchlist!", movie_id)))
}

pub async fn remove_from_watchlist(client: &Client, api: &ApiConfig, movie_id: MovieId) -> ClientResult<String> {
    debug!(movie_id, "DELETE /api/watchlist");
    let response = client
        .delete(api.endpoint("/api/watchlist"))
        .json(&MovieIdBody { movie_id })
        .send()
        .await?;
    let parsed: MessageResponse = read_json(response, "remove from watchlist").await?;
    Ok(message_or(parsed, || format!("Movie {} removed from watchlist!", movie_id)))
}

pub async fn toggle_favourite(client: &Client, api: &ApiConfig, movie_id: MovieId) -> ClientResult<FavouriteToggle> {
    debug!(movie_id, "PUT /api/watchlist/favourite");
    let response = client
        .put(api.endpoint("/api/watchlist/favourite"))
        .json(&MovieIdBody { movie_id })
        .send()
        .await?;
    read_json(response, "toggle favourite").await
}

pub async fn set_rating(
    client: &Client,
    api: &ApiConfig,
    movie_id: MovieId,
    rating: StarRating,
) -> ClientResult<String> {
    debug!(movie_id, rating = rating.stars(), "PUT /api/watchlist/rating");
    let response = client
        .put(api.endpoint("/api/watchlist/rating"))
        .json(&RatingBody { movie_id, rating })
        .send()
        .await?;
    let parsed: MessageResponse = read_json(response, "update rating").await?;
    Ok(message_or(parsed, || {
        format!("Rating for movie {} updated to {}.", movie_id, rating.stars())
    }))
}

pub async fn set_feedback(
    client: &Client,
    api: &ApiConfig,
    movie_id: MovieId,
    feedback: Feedback,
) -> ClientResult<String> {
    debug!(movie_id, feedback = %feedback, "PUT /api/watchlist/feedback");
    let response = client
        .put(api.endpoint("/api/watchlist/feedback"))
        .json(&FeedbackBody { movie_id, feedback })
        .send()
        .await?;
    let parsed: MessageResponse = read_json(response, "update feedback").await?;
    Ok(message_or(parsed, || {
        format!("Feedback for movie {} updated to {}.", movie_id, feedback)
    }))
}

pub async fn get_movie_detail(client: &Client, api: &ApiConfig, movie_id: MovieId) -> ClientResult<MovieDetail> {
    debug!(movie_id, "GET /api/movie/{}", movie_id);
    let response = client
        .get(api.endpoint(&format!("/api/movie/{}", movie_id)))
        .send()
        .await?;
    read_json(response, "fetch movie details").await
}

pub async fn search_movies(client: &Client, api: &ApiConfig, query: &SearchQuery) -> ClientResult<Vec<MovieSummary>> {
    let params = query.to_params();
    debug!(?params, "GET /api/search");
    let response = client
        .get(api.endpoint("/api/search"))
        .query(&params)
        .send()
        .await?;
    let parsed: ResultsResponse = read_json(response, "search").await?;
    Ok(parsed.results)
}

pub async fn get_trending(client: &Client, api: &ApiConfig) -> ClientResult<Vec<MovieSummary>> {
    debug!("GET /api/trending");
    let response = client.get(api.endpoint("/api/trending")).send().await?;
    let parsed: ResultsResponse = read_json(response, "fetch trending").await?;
    Ok(parsed.results)
}

pub async fn get_recommendations(client: &Client, api: &ApiConfig) -> ClientResult<Vec<MovieSummary>> {
    debug!("GET /api/recommendations");
    let response = client.get(api.endpoint("/api/recommendations")).send().await?;
    let parsed: RecommendationsResponse = read_json(response, "fetch recommendations").await?;
    Ok(parsed.recommendations)
}
