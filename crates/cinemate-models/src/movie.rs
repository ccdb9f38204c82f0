use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use crate::error::ValidationError;

/// Catalog identifier of a movie (TMDb id on the backend)
pub type MovieId = u64;

/// Values the backend substitutes when a field is missing upstream
const PLACEHOLDERS: &[&str] = &[
    "",
    "N/A",
    "Unknown",
    "No synopsis available",
    "https://via.placeholder.com/500x750?text=No+Image",
];

pub fn validate_movie_id(id: MovieId) -> Result<MovieId, ValidationError> {
    if id == 0 {
        return Err(ValidationError::InvalidMovieId);
    }
    Ok(id)
}

/// A movie as returned by search, trending and recommendation feeds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub poster_url: Option<String>,
}

impl MovieSummary {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(parse_year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: String,
}

/// Full movie record from `GET /api/movie/{id}`
///
/// The backend uses display-style keys ("Release Date", "Poster URL"), kept
/// as-is on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Overview", default, deserialize_with = "deserialize_text")]
    pub overview: Option<String>,
    #[serde(rename = "Release Date", default, deserialize_with = "deserialize_text")]
    pub release_date: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "deserialize_score")]
    pub rating: Option<f64>,
    #[serde(rename = "Poster URL", default, deserialize_with = "deserialize_text")]
    pub poster_url: Option<String>,
    #[serde(rename = "Cast", default)]
    pub cast: Vec<CastMember>,
    #[serde(rename = "Trailer", default, deserialize_with = "deserialize_text")]
    pub trailer: Option<String>,
}

impl MovieDetail {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(parse_year)
    }
}

fn parse_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.year())
        .ok()
        .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !PLACEHOLDERS.contains(&s.as_str())))
}

/// Scores arrive either as numbers or as the string "N/A"
fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Score>::deserialize(deserializer)? {
        Some(Score::Number(n)) => Some(n),
        Some(Score::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_with_placeholders() {
        let summary: MovieSummary = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "No synopsis available",
            "release_date": "Unknown",
            "rating": "N/A",
            "poster_url": "https://image.tmdb.org/t/p/w500/matrix.jpg"
        }))
        .unwrap();

        assert_eq!(summary.id, 603);
        assert_eq!(summary.overview, None);
        assert_eq!(summary.release_date, None);
        assert_eq!(summary.rating, None);
        assert_eq!(summary.release_year(), None);
        assert!(summary.poster_url.is_some());
    }

    #[test]
    fn test_summary_with_values() {
        let summary: MovieSummary = serde_json::from_value(json!({
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-15",
            "rating": 8.4
        }))
        .unwrap();

        assert_eq!(summary.rating, Some(8.4));
        assert_eq!(summary.release_year(), Some(2010));
        assert_eq!(summary.poster_url, None);
    }

    #[test]
    fn test_placeholder_poster_is_absent() {
        let summary: MovieSummary = serde_json::from_value(json!({
            "id": 11,
            "title": "Star Wars",
            "poster_url": "https://via.placeholder.com/500x750?text=No+Image"
        }))
        .unwrap();
        assert_eq!(summary.poster_url, None);

        let detail: MovieDetail = serde_json::from_value(json!({
            "Title": "Star Wars",
            "Poster URL": "https://via.placeholder.com/500x750?text=No+Image"
        }))
        .unwrap();
        assert_eq!(detail.poster_url, None);
    }

    #[test]
    fn test_integer_score() {
        let summary: MovieSummary =
            serde_json::from_value(json!({"id": 1, "title": "x", "rating": 7})).unwrap();
        assert_eq!(summary.rating, Some(7.0));
    }

    #[test]
    fn test_detail_display_keys() {
        let detail: MovieDetail = serde_json::from_value(json!({
            "Title": "Inception",
            "Overview": "A thief who steals corporate secrets...",
            "Release Date": "2010-07-15",
            "Rating": 8.369,
            "Poster URL": "https://image.tmdb.org/t/p/w500/inception.jpg",
            "Cast": [
                {"name": "Leonardo DiCaprio", "character": "Cobb"},
                {"name": "Elliot Page"}
            ],
            "Trailer": null
        }))
        .unwrap();

        assert_eq!(detail.title, "Inception");
        assert_eq!(detail.release_year(), Some(2010));
        assert_eq!(detail.cast.len(), 2);
        assert_eq!(detail.cast[1].character, "");
        assert_eq!(detail.trailer, None);
    }

    #[test]
    fn test_partial_release_date() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("soon"), None);
    }

    #[test]
    fn test_validate_movie_id() {
        assert_eq!(validate_movie_id(42), Ok(42));
        assert_eq!(validate_movie_id(0), Err(ValidationError::InvalidMovieId));
    }
}
