use super::progress::{is_interactive, Spinner};
use super::prompts::prompt_star_rating;
use super::render::drain_events;
use super::Session;
use crate::output::Output;
use cinemate_client::MovieCatalog;
use cinemate_core::{watchlist_rows, RatingWidget, SyncError, WatchlistRow};
use cinemate_models::{Feedback, MovieId};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use serde_json::json;

fn rows_table(rows: &[WatchlistRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Favourite").add_attribute(Attribute::Bold),
        Cell::new("Your rating").add_attribute(Attribute::Bold),
    ]);
    for row in rows {
        let title = Cell::new(row.title());
        table.add_row(vec![
            Cell::new(row.entry.movie_id),
            if row.detail.is_some() { title.fg(Color::Cyan) } else { title.fg(Color::DarkGrey) },
            Cell::new(row.release_year().map_or_else(String::new, |y| y.to_string())),
            Cell::new(if row.entry.favourite { "★" } else { "" }).fg(Color::Yellow),
            Cell::new(row.entry.user_rating.map_or_else(String::new, |r| r.as_stars())),
        ]);
    }
    table
}

pub async fn run_list(session: &Session, output: &Output) -> Result<()> {
    let mut events = session.sync.subscribe();
    let spinner = Spinner::start("Loading watchlist...");
    let rows = watchlist_rows(
        &session.sync,
        session.client.as_ref(),
        session.config.view.detail_concurrency,
    )
    .await;
    spinner.finish();
    let rows = rows?;

    if !output.is_human() {
        output.json(&json!({ "type": "watchlist", "entries": rows }));
        return Ok(());
    }

    drain_events(&mut events, output);
    if rows.is_empty() {
        output.info("Your watchlist is empty. Add a movie with `cinemate add <ID>`.");
        return Ok(());
    }
    let missing = rows.iter().filter(|row| row.detail.is_none()).count();
    output.table(rows_table(&rows));
    if missing > 0 {
        output.warn(format!("Details unavailable for {} movie(s)", missing));
    }
    Ok(())
}

pub async fn run_add(session: &Session, movie_id: MovieId, output: &Output) -> Result<()> {
    let mut events = session.sync.subscribe();
    let message = session.sync.add(movie_id).await?;
    output.success(message);
    drain_events(&mut events, output);
    Ok(())
}

pub async fn run_remove(session: &Session, movie_id: MovieId, output: &Output) -> Result<()> {
    let mut events = session.sync.subscribe();
    let message = session.sync.remove(movie_id).await?;
    output.success(message);
    drain_events(&mut events, output);
    Ok(())
}

pub async fn run_favourite(session: &Session, movie_id: MovieId, output: &Output) -> Result<()> {
    let mut events = session.sync.subscribe();
    session.sync.toggle_favourite(movie_id).await?;
    drain_events(&mut events, output);
    Ok(())
}

/// Rate with `--stars`, or pick interactively when running in a terminal
pub async fn run_rate(session: &Session, movie_id: MovieId, stars: Option<i64>, output: &Output) -> Result<()> {
    let mut widget = RatingWidget::new(movie_id);

    match stars {
        Some(stars) => {
            widget.select(stars)?;
        }
        None if is_interactive() => {
            let entry = session
                .sync
                .entry(movie_id)
                .await?
                .ok_or(SyncError::NotInWatchlist(movie_id))?;
            widget = RatingWidget::with_selection(movie_id, entry.user_rating);

            let title = match session.client.movie_detail(movie_id).await {
                Ok(detail) => detail.title,
                Err(e) => {
                    tracing::debug!(movie_id, "No title for rating prompt: {}", e);
                    format!("movie {}", movie_id)
                }
            };
            if !prompt_star_rating(&mut widget, &title)? {
                output.info("Rating cancelled.");
                return Ok(());
            }
        }
        // Nothing selected; submit reports it
        None => {}
    }

    let mut events = session.sync.subscribe();
    let message = widget.submit(&session.sync).await?;
    output.success(message);
    drain_events(&mut events, output);
    Ok(())
}

pub async fn run_feedback(session: &Session, movie_id: MovieId, feedback: Feedback, output: &Output) -> Result<()> {
    let mut events = session.sync.subscribe();
    let message = session.sync.submit_feedback(movie_id, feedback).await?;
    output.success(message);
    drain_events(&mut events, output);
    Ok(())
}
