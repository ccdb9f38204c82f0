use cinemate_models::{Feedback, MovieId, StarRating};
use serde::Serialize;
use std::fmt;

/// Which watchlist operation an event or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Refresh,
    Add,
    Remove,
    ToggleFavourite,
    SetRating,
    SubmitFeedback,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Refresh => "refresh",
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::ToggleFavourite => "toggle_favourite",
            Operation::SetRating => "set_rating",
            Operation::SubmitFeedback => "submit_feedback",
        }
    }

    /// Operations the store rejects with 404 when the movie is not listed
    pub fn requires_entry(self) -> bool {
        matches!(
            self,
            Operation::ToggleFavourite | Operation::SetRating | Operation::SubmitFeedback
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State change published to subscribers of a `WatchlistSync`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchlistEvent {
    Refreshed { entries: usize },
    Added { movie_id: MovieId },
    Removed { movie_id: MovieId },
    FavouriteChanged { movie_id: MovieId, favourite: bool },
    Rated { movie_id: MovieId, rating: StarRating },
    FeedbackRecorded { movie_id: MovieId, feedback: Feedback },
    Failed {
        movie_id: Option<MovieId>,
        operation: Operation,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = WatchlistEvent::FavouriteChanged {
            movie_id: 42,
            favourite: true,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"event": "favourite_changed", "movie_id": 42, "favourite": true})
        );

        let failed = WatchlistEvent::Failed {
            movie_id: None,
            operation: Operation::Refresh,
            message: "server unreachable".to_string(),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["operation"], "refresh");
        assert!(value["movie_id"].is_null());
    }

    #[test]
    fn test_requires_entry() {
        assert!(Operation::SetRating.requires_entry());
        assert!(!Operation::Add.requires_entry());
        assert_eq!(Operation::ToggleFavourite.to_string(), "toggle_favourite");
    }
}
