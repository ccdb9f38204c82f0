use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use cinemate_client::{ApiClient, ClientError, MovieCatalog, WatchlistStore};
use cinemate_config::ApiConfig;
use cinemate_models::{Feedback, SearchQuery, SortOrder, StarRating, ValidationError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Minimal stand-in for the Flask backend, keeping the watchlist in memory
#[derive(Default)]
struct Backend {
    rows: Mutex<Vec<(u64, bool, i64, Option<String>)>>,
    last_search: Mutex<Option<HashMap<String, String>>>,
}

type Shared = Arc<Backend>;

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Movie not found in watchlist"}))).into_response()
}

fn movie_id(body: &Value) -> u64 {
    body["movieId"].as_u64().unwrap_or(0)
}

async fn list(State(backend): State<Shared>) -> Json<Value> {
    let rows = backend.rows.lock().unwrap();
    let watchlist: Vec<Value> = rows
        .iter()
        .map(|(id, fav, rating, _)| json!({"movie_id": id, "favourite": fav, "rating": rating}))
        .collect();
    Json(json!({ "watchlist": watchlist }))
}

async fn add(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = movie_id(&body);
    if id == 0 {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "movieId is required"}))).into_response();
    }
    let mut rows = backend.rows.lock().unwrap();
    if rows.iter().any(|row| row.0 == id) {
        return Json(json!({"message": format!("Movie {} is already in the watchlist.", id)})).into_response();
    }
    rows.push((id, false, 0, None));
    Json(json!({"message": format!("Movie {} added to watchlist!", id)})).into_response()
}

async fn remove(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = movie_id(&body);
    backend.rows.lock().unwrap().retain(|row| row.0 != id);
    Json(json!({"message": format!("Movie {} removed from watchlist!", id)})).into_response()
}

async fn favourite(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = movie_id(&body);
    let mut rows = backend.rows.lock().unwrap();
    match rows.iter_mut().find(|row| row.0 == id) {
        Some(row) => {
            row.1 = !row.1;
            Json(json!({"message": "ok", "favourite": row.1})).into_response()
        }
        None => not_found(),
    }
}

async fn rating(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = movie_id(&body);
    let mut rows = backend.rows.lock().unwrap();
    match rows.iter_mut().find(|row| row.0 == id) {
        Some(row) => {
            row.2 = body["rating"].as_i64().unwrap_or(0);
            Json(json!({"message": format!("Rating for movie {} updated to {}.", id, row.2)})).into_response()
        }
        None => not_found(),
    }
}

async fn feedback(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = movie_id(&body);
    let mut rows = backend.rows.lock().unwrap();
    match rows.iter_mut().find(|row| row.0 == id) {
        Some(row) => {
            row.3 = body["feedback"].as_str().map(str::to_string);
            Json(json!({"message": "saved", "feedback": row.3})).into_response()
        }
        None => not_found(),
    }
}

async fn movie(Path(id): Path<u64>) -> Response {
    match id {
        603 => Json(json!({
            "Title": "The Matrix",
            "Overview": "A hacker learns the truth about reality.",
            "Release Date": "1999-03-30",
            "Rating": 8.2,
            "Poster URL": "https://image.tmdb.org/t/p/w500/matrix.jpg",
            "Cast": [{"name": "Keanu Reeves", "character": "Neo"}],
            "Trailer": "https://www.youtube.com/watch?v=vKQi3bBA1y8"
        }))
        .into_response(),
        500 => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "Failed to fetch movie details"})))
            .into_response(),
        13 => "definitely not json".into_response(),
        other => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("Movie with ID {} not found", other)})),
        )
            .into_response(),
    }
}

async fn search(State(backend): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    *backend.last_search.lock().unwrap() = Some(params);
    Json(json!({"results": [
        {"id": 268, "title": "Batman", "release_date": "1989-06-23", "rating": 7.2, "poster_url": null}
    ]}))
}

async fn trending() -> Json<Value> {
    Json(json!({"results": [
        {"id": 1, "title": "Fresh", "release_date": "Unknown", "rating": "N/A"},
        {"id": 2, "title": "Popular", "release_date": "2024-01-01", "rating": 6}
    ]}))
}

async fn recommendations() -> Json<Value> {
    Json(json!({"recommendations": [{"id": 99, "title": "Similar"}]}))
}

async fn spawn_backend() -> (ApiClient, Shared) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/watchlist", get(list).post(add).delete(remove))
        .route("/api/watchlist/favourite", put(favourite))
        .route("/api/watchlist/rating", put(rating))
        .route("/api/watchlist/feedback", put(feedback))
        .route("/api/movie/:id", get(movie))
        .route("/api/search", get(search))
        .route("/api/trending", get(trending))
        .route("/api/recommendations", get(recommendations))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = ApiConfig {
        base_url: format!("http://{}", addr),
        ..ApiConfig::default()
    };
    (ApiClient::new(api).unwrap(), backend)
}

#[tokio::test]
async fn test_watchlist_round_trips() {
    let (client, _backend) = spawn_backend().await;

    assert!(client.fetch_watchlist().await.unwrap().is_empty());

    let message = client.add(42).await.unwrap();
    assert_eq!(message, "Movie 42 added to watchlist!");
    let again = client.add(42).await.unwrap();
    assert_eq!(again, "Movie 42 is already in the watchlist.");

    let toggle = client.toggle_favourite(42).await.unwrap();
    assert!(toggle.favourite);
    assert_eq!(toggle.message.as_deref(), Some("ok"));

    let message = client.set_rating(42, StarRating::new(4).unwrap()).await.unwrap();
    assert_eq!(message, "Rating for movie 42 updated to 4.");

    client.submit_feedback(42, Feedback::Like).await.unwrap();

    let watchlist = client.fetch_watchlist().await.unwrap();
    assert_eq!(watchlist.len(), 1);
    assert_eq!(watchlist[0].movie_id, 42);
    assert!(watchlist[0].favourite);
    assert_eq!(watchlist[0].user_rating, Some(StarRating::new(4).unwrap()));

    client.remove(42).await.unwrap();
    assert!(client.fetch_watchlist().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unrated_entry_decodes_as_none() {
    let (client, _backend) = spawn_backend().await;
    client.add(7).await.unwrap();

    let watchlist = client.fetch_watchlist().await.unwrap();
    assert_eq!(watchlist[0].user_rating, None);
    assert!(!watchlist[0].favourite);
}

#[tokio::test]
async fn test_favourite_on_missing_entry_is_not_found() {
    let (client, _backend) = spawn_backend().await;

    let err = client.toggle_favourite(5).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Movie not found in watchlist"));

    let err = client.set_rating(5, StarRating::new(3).unwrap()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_movie_detail_and_status_mapping() {
    let (client, _backend) = spawn_backend().await;

    let detail = client.movie_detail(603).await.unwrap();
    assert_eq!(detail.title, "The Matrix");
    assert_eq!(detail.cast[0].character, "Neo");
    assert_eq!(detail.release_year(), Some(1999));

    let err = client.movie_detail(404404).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { ref message } if message.contains("404404")));

    let err = client.movie_detail(500).await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to fetch movie details");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let err = client.movie_detail(13).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_search_sends_only_set_params() {
    let (client, backend) = spawn_backend().await;

    let query = SearchQuery::text(" Batman ").with_year(1989).with_sort(SortOrder::PopularityDesc);
    let results = client.search(&query).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].release_year(), Some(1989));

    let params = backend.last_search.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("query").map(String::as_str), Some("Batman"));
    assert_eq!(params.get("year").map(String::as_str), Some("1989"));
    assert_eq!(params.get("sort").map(String::as_str), Some("popularity.desc"));
    assert!(!params.contains_key("genre"));
    assert!(!params.contains_key("minRating"));
}

#[tokio::test]
async fn test_empty_search_never_reaches_backend() {
    let (client, backend) = spawn_backend().await;

    let err = client.search(&SearchQuery::text("   ")).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ValidationError::EmptySearch)));
    assert!(backend.last_search.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_movie_id_never_reaches_backend() {
    let (client, _backend) = spawn_backend().await;

    let err = client.add(0).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ValidationError::InvalidMovieId)));
}

#[tokio::test]
async fn test_trending_and_recommendations() {
    let (client, _backend) = spawn_backend().await;

    let trending = client.trending().await.unwrap();
    assert_eq!(trending.len(), 2);
    assert_eq!(trending[0].rating, None);
    assert_eq!(trending[0].release_date, None);
    assert_eq!(trending[1].rating, Some(6.0));

    let recommended = client.recommendations().await.unwrap();
    assert_eq!(recommended[0].id, 99);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(ApiConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 2,
        ..ApiConfig::default()
    })
    .unwrap();

    let err = client.fetch_watchlist().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}
