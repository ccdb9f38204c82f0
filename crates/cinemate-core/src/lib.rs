pub mod error;
pub mod events;
pub mod memory;
pub mod snapshot;
pub mod sync;
pub mod view;
pub mod widget;

pub use error::SyncError;
pub use events::{Operation, WatchlistEvent};
pub use memory::MemoryStore;
pub use snapshot::WatchlistSnapshot;
pub use sync::WatchlistSync;
pub use view::{detail_view, watchlist_rows, DetailView, WatchlistRow};
pub use widget::RatingWidget;
