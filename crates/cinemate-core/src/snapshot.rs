use cinemate_models::{MovieId, StarRating, WatchlistEntry};
use std::collections::HashMap;
use tracing::warn;

/// One fetched copy of the watchlist, keyed by movie id
///
/// Lookups are O(1); iteration keeps the order the store returned.
#[derive(Debug, Clone, Default)]
pub struct WatchlistSnapshot {
    order: Vec<MovieId>,
    entries: HashMap<MovieId, WatchlistEntry>,
}

impl WatchlistSnapshot {
    /// Build from the store's list. A duplicate movie id keeps its first entry.
    pub fn from_entries(entries: Vec<WatchlistEntry>) -> Self {
        let mut snapshot = Self::default();
        for entry in entries {
            let movie_id = entry.movie_id;
            if !snapshot.insert_if_absent(entry) {
                warn!(movie_id, "Store returned a duplicate watchlist entry, keeping the first");
            }
        }
        snapshot
    }

    pub fn is_member(&self, movie_id: MovieId) -> bool {
        self.entries.contains_key(&movie_id)
    }

    /// False for non-members as well as non-favourites
    pub fn is_favourite(&self, movie_id: MovieId) -> bool {
        self.entries.get(&movie_id).map_or(false, |e| e.favourite)
    }

    pub fn rating(&self, movie_id: MovieId) -> Option<StarRating> {
        self.entries.get(&movie_id).and_then(|e| e.user_rating)
    }

    pub fn get(&self, movie_id: MovieId) -> Option<&WatchlistEntry> {
        self.entries.get(&movie_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &WatchlistEntry> {
        self.order.iter().filter_map(move |id| self.entries.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn insert_if_absent(&mut self, entry: WatchlistEntry) -> bool {
        if self.entries.contains_key(&entry.movie_id) {
            return false;
        }
        self.order.push(entry.movie_id);
        self.entries.insert(entry.movie_id, entry);
        true
    }

    pub(crate) fn remove(&mut self, movie_id: MovieId) -> Option<WatchlistEntry> {
        let removed = self.entries.remove(&movie_id)?;
        self.order.retain(|id| *id != movie_id);
        Some(removed)
    }

    /// Apply `f` to the entry; false when the movie is not in the snapshot
    pub(crate) fn update<F>(&mut self, movie_id: MovieId, f: F) -> bool
    where
        F: FnOnce(&mut WatchlistEntry),
    {
        match self.entries.get_mut(&movie_id) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }
}
