use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::ValidationError;
use crate::rating::StarRating;

/// Recommendation signal attached to a watchlist entry
///
/// Wire form is a plain string: "like", "not_interested" or "rated_N".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Feedback {
    Like,
    NotInterested,
    Rated(StarRating),
}

impl FromStr for Feedback {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "like" => Ok(Feedback::Like),
            "not_interested" => Ok(Feedback::NotInterested),
            other => {
                let stars = other
                    .strip_prefix("rated_")
                    .and_then(|n| n.parse::<i64>().ok())
                    .ok_or_else(|| ValidationError::UnknownFeedback(s.to_string()))?;
                Ok(Feedback::Rated(StarRating::new(stars)?))
            }
        }
    }
}

impl TryFrom<String> for Feedback {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Feedback> for String {
    fn from(feedback: Feedback) -> Self {
        feedback.to_string()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Like => write!(f, "like"),
            Feedback::NotInterested => write!(f, "not_interested"),
            Feedback::Rated(rating) => write!(f, "rated_{}", rating.stars()),
        }
    }
}
