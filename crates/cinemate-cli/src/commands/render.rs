use crate::output::Output;
use cinemate_core::WatchlistEvent;
use owo_colors::OwoColorize;
use serde_json::json;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Human line for a state change, if it adds anything to the store's message
fn describe(event: &WatchlistEvent) -> Option<String> {
    match event {
        WatchlistEvent::FavouriteChanged { movie_id, favourite: true } => {
            Some(format!("{} Movie {} is a favourite", "★".yellow(), movie_id))
        }
        WatchlistEvent::FavouriteChanged { movie_id, favourite: false } => {
            Some(format!("{} Movie {} is no longer a favourite", "☆".dimmed(), movie_id))
        }
        WatchlistEvent::Rated { movie_id, rating } => {
            Some(format!("Movie {} rated {}", movie_id, rating.as_stars().yellow()))
        }
        WatchlistEvent::FeedbackRecorded { movie_id, feedback } => {
            Some(format!("Movie {} feedback: {}", movie_id, feedback))
        }
        WatchlistEvent::Refreshed { entries } => Some(format!("Watchlist holds {} movies", entries)),
        // Membership changes are covered by the store message; failures by the caller
        WatchlistEvent::Added { .. } | WatchlistEvent::Removed { .. } | WatchlistEvent::Failed { .. } => None,
    }
}

pub fn render_event(event: &WatchlistEvent, output: &Output) {
    if output.is_human() {
        if let Some(line) = describe(event) {
            output.info(line);
        }
        return;
    }

    if let WatchlistEvent::Failed { .. } = event {
        return;
    }
    match serde_json::to_value(event) {
        Ok(value) => output.json(&json!({ "type": "event", "data": value })),
        Err(e) => tracing::warn!("Could not serialise watchlist event: {}", e),
    }
}

/// Render everything published since the receiver was subscribed
pub fn drain_events(events: &mut broadcast::Receiver<WatchlistEvent>, output: &Output) {
    loop {
        match events.try_recv() {
            Ok(event) => render_event(&event, output),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Event renderer fell behind");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
