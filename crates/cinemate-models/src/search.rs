use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    PopularityDesc,
    PopularityAsc,
    RatingDesc,
    RatingAsc,
    ReleaseDateDesc,
    ReleaseDateAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::PopularityDesc,
        SortOrder::PopularityAsc,
        SortOrder::RatingDesc,
        SortOrder::RatingAsc,
        SortOrder::ReleaseDateDesc,
        SortOrder::ReleaseDateAsc,
    ];

    /// Value of the `sort` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::PopularityAsc => "popularity.asc",
            SortOrder::RatingDesc => "vote_average.desc",
            SortOrder::RatingAsc => "vote_average.asc",
            SortOrder::ReleaseDateDesc => "primary_release_date.desc",
            SortOrder::ReleaseDateAsc => "primary_release_date.asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == wanted)
            .ok_or(ValidationError::UnknownSortOrder(s.to_string()))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text search, optionally narrowed by discover filters
///
/// With no text the backend switches to discover mode and ranks by the
/// filters alone, so at least one of the two must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub year: Option<u16>,
    pub genre: Option<u32>,
    pub min_rating: Option<f32>,
    pub sort: Option<SortOrder>,
}

impl SearchQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_genre(mut self, genre: u32) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn with_min_rating(mut self, min_rating: f32) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    fn trimmed_query(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn has_filters(&self) -> bool {
        self.year.is_some() || self.genre.is_some() || self.min_rating.is_some() || self.sort.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trimmed_query().is_none() && !self.has_filters() {
            return Err(ValidationError::EmptySearch);
        }
        if let Some(min_rating) = self.min_rating {
            if !(0.0..=10.0).contains(&min_rating) {
                return Err(ValidationError::MinRatingOutOfRange(min_rating));
            }
        }
        Ok(())
    }

    /// Query parameters for `GET /api/search`, only those that are set
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(query) = self.trimmed_query() {
            params.push(("query", query.to_string()));
        }
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
        }
        if let Some(genre) = self.genre {
            params.push(("genre", genre.to_string()));
        }
        if let Some(min_rating) = self.min_rating {
            params.push(("minRating", min_rating.to_string()));
        }
        if let Some(sort) = self.sort {
            params.push(("sort", sort.as_str().to_string()));
        }
        params
    }
}
