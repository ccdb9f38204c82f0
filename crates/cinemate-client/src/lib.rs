pub mod api;
pub mod client;
pub mod error;
pub mod traits;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use traits::{FavouriteToggle, MovieCatalog, WatchlistStore};
