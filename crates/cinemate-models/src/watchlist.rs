use serde::{Deserialize, Deserializer, Serialize};
use crate::feedback::Feedback;
use crate::movie::MovieId;
use crate::rating::StarRating;

/// One record of the remote watchlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchlistEntry {
    #[serde(rename = "movie_id", alias = "movieId")]
    pub movie_id: MovieId,
    #[serde(default)]
    pub favourite: bool,
    #[serde(rename = "rating", alias = "userRating", default, deserialize_with = "deserialize_user_rating")]
    pub user_rating: Option<StarRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl WatchlistEntry {
    /// A freshly added entry: not a favourite, unrated
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            favourite: false,
            user_rating: None,
            feedback: None,
        }
    }
}

/// The store keeps "unrated" as 0; anything outside 1-5 is treated as unrated
fn deserialize_user_rating<'de, D>(deserializer: D) -> Result<Option<StarRating>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|stars| StarRating::new(stars).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_shape() {
        let entry: WatchlistEntry = serde_json::from_value(json!({
            "movie_id": 42,
            "favourite": true,
            "rating": 0
        }))
        .unwrap();

        assert_eq!(entry.movie_id, 42);
        assert!(entry.favourite);
        assert_eq!(entry.user_rating, None);
        assert_eq!(entry.feedback, None);
    }

    #[test]
    fn test_camel_case_alias_and_rating() {
        let entry: WatchlistEntry = serde_json::from_value(json!({
            "movieId": 7,
            "userRating": 4,
            "feedback": "like"
        }))
        .unwrap();

        assert_eq!(entry.movie_id, 7);
        assert!(!entry.favourite);
        assert_eq!(entry.user_rating, Some(StarRating::new(4).unwrap()));
        assert_eq!(entry.feedback, Some(Feedback::Like));
    }

    #[test]
    fn test_null_rating() {
        let entry: WatchlistEntry =
            serde_json::from_value(json!({"movie_id": 1, "favourite": false, "rating": null})).unwrap();
        assert_eq!(entry, WatchlistEntry::new(1));
    }
}
