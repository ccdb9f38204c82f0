use super::progress::Spinner;
use super::Session;
use crate::output::Output;
use cinemate_client::MovieCatalog;
use cinemate_core::{detail_view, DetailView};
use cinemate_models::{MovieId, MovieSummary, SearchQuery};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

fn score(rating: Option<f64>) -> String {
    rating.map_or_else(|| "N/A".to_string(), |r| format!("{:.1}", r))
}

fn year(year: Option<i32>) -> String {
    year.map_or_else(|| "—".to_string(), |y| y.to_string())
}

fn summary_table(movies: &[MovieSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
    ]);
    for movie in movies {
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title).fg(Color::Cyan),
            Cell::new(year(movie.release_year())),
            Cell::new(score(movie.rating)),
        ]);
    }
    table
}

fn print_summaries(kind: &str, movies: &[MovieSummary], output: &Output) {
    if output.is_human() {
        if movies.is_empty() {
            output.info(format!("No {} found.", kind));
        } else {
            output.table(summary_table(movies));
        }
    } else {
        output.json(&json!({ "type": kind, "results": movies }));
    }
}

pub async fn run_search(session: &Session, query: SearchQuery, output: &Output) -> Result<()> {
    tracing::debug!(query = ?query.query, filters = query.has_filters(), "Search command started");
    let spinner = Spinner::start("Searching...");
    let results = session.client.search(&query).await;
    spinner.finish();

    print_summaries("results", &results?, output);
    Ok(())
}

pub async fn run_trending(session: &Session, output: &Output) -> Result<()> {
    let spinner = Spinner::start("Fetching trending movies...");
    let results = session.client.trending().await;
    spinner.finish();

    print_summaries("trending", &results?, output);
    Ok(())
}

pub async fn run_recommendations(session: &Session, output: &Output) -> Result<()> {
    let spinner = Spinner::start("Fetching recommendations...");
    let results = session.client.recommendations().await;
    spinner.finish();

    let results = results?;
    if results.is_empty() && output.is_human() {
        output.info("No recommendations yet. Like or rate a few movies on your watchlist first.");
        return Ok(());
    }
    print_summaries("recommendations", &results, output);
    Ok(())
}

fn print_detail(view: &DetailView, output: &Output) {
    let detail = &view.detail;
    output.info(format!(
        "{} ({})",
        detail.title.bold().bright_cyan(),
        year(detail.release_year())
    ));

    let mut table = Table::new();
    table.add_row(vec![Cell::new("Rating"), Cell::new(score(detail.rating))]);
    table.add_row(vec![
        Cell::new("Watchlist"),
        Cell::new(if view.in_watchlist { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    if view.in_watchlist {
        table.add_row(vec![
            Cell::new("Favourite"),
            Cell::new(if view.favourite { "★".yellow().to_string() } else { "☆".to_string() }),
        ]);
        table.add_row(vec![
            Cell::new("Your rating"),
            Cell::new(view.user_rating.map_or_else(|| "not rated".to_string(), |r| r.as_stars())),
        ]);
    }
    if let Some(trailer) = &detail.trailer {
        table.add_row(vec![Cell::new("Trailer"), Cell::new(trailer)]);
    }
    output.table(table);

    if let Some(overview) = &detail.overview {
        output.info(overview);
    }
    if !detail.cast.is_empty() {
        let cast: Vec<String> = detail
            .cast
            .iter()
            .map(|member| format!("{} as {}", member.name, member.character))
            .collect();
        output.info(format!("Cast: {}", cast.join(", ")));
    }
}

pub async fn run_movie(session: &Session, movie_id: MovieId, output: &Output) -> Result<()> {
    let spinner = Spinner::start("Loading movie...");
    let view = detail_view(&session.sync, session.client.as_ref(), movie_id).await;
    spinner.finish();

    let view = view?;
    if output.is_human() {
        print_detail(&view, output);
    } else {
        output.json(&json!({ "type": "movie", "movie": view }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_and_year_placeholders() {
        assert_eq!(score(None), "N/A");
        assert_eq!(score(Some(7.26)), "7.3");
        assert_eq!(year(Some(1999)), "1999");
        assert_eq!(year(None), "—");
    }

    #[test]
    fn test_summary_table_has_row_per_movie() {
        let movies = vec![MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            overview: None,
            release_date: Some("1999-03-30".to_string()),
            rating: Some(8.2),
            poster_url: None,
        }];
        let rendered = summary_table(&movies).to_string();
        assert!(rendered.contains("The Matrix"));
        assert!(rendered.contains("1999"));
        assert!(rendered.contains("8.2"));
    }
}
