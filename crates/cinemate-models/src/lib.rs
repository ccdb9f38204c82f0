pub mod error;
pub mod feedback;
pub mod movie;
pub mod rating;
pub mod search;
pub mod watchlist;

pub use error::ValidationError;
pub use feedback::Feedback;
pub use movie::{validate_movie_id, CastMember, MovieDetail, MovieId, MovieSummary};
pub use rating::StarRating;
pub use search::{SearchQuery, SortOrder};
pub use watchlist::WatchlistEntry;
