use clap::{ArgAction, Parser, Subcommand};
use cinemate_client::ClientError;
use cinemate_core::SyncError;
use cinemate_models::{Feedback, MovieId, SearchQuery, SortOrder};
use commands::{catalog, config, watchlist, Session};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinemate")]
#[command(about = "CineMate - search movies and keep your watchlist in sync")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Catalog backend URL (overrides config file and CINEMATE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title and filters
    #[command(long_about = "Search the catalog. Without a query, the filters alone are used to discover movies; at least one of the two is required.")]
    Search {
        /// Title to search for
        query: Option<String>,

        /// Release year
        #[arg(long)]
        year: Option<u16>,

        /// Genre id
        #[arg(long)]
        genre: Option<u32>,

        /// Minimum average rating (0-10)
        #[arg(long)]
        min_rating: Option<f32>,

        /// Sort order, e.g. popularity.desc or vote_average.desc
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Show this week's trending movies
    Trending,
    /// Show a movie with its watchlist state
    Movie {
        id: MovieId,
    },
    /// List the watchlist
    Watchlist,
    /// Add a movie to the watchlist
    Add {
        id: MovieId,
    },
    /// Remove a movie from the watchlist
    Remove {
        id: MovieId,
    },
    /// Toggle a watchlist movie's favourite flag
    Favourite {
        id: MovieId,
    },
    /// Rate a watchlist movie from 1 to 5 stars
    #[command(long_about = "Rate a movie on your watchlist. Without --stars an interactive star selector is shown when running in a terminal.")]
    Rate {
        id: MovieId,

        /// Stars to give (1-5)
        #[arg(long, allow_hyphen_values = true)]
        stars: Option<i64>,
    },
    /// Record recommendation feedback on a watchlist movie
    Feedback {
        id: MovieId,

        /// like, not-interested or rated-N
        feedback: Feedback,
    },
    /// Movies recommended from your feedback
    Recommendations,
    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a configuration file with defaults
    Init {
        /// Catalog backend URL to store (prompted for when omitted in a terminal)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Send logs to a daily rotated file next to the configuration
        #[arg(long, action = ArgAction::SetTrue)]
        log_to_file: bool,
    },
}

async fn run(cli: Cli, output: &output::Output) -> color_eyre::Result<()> {
    let (config, config_file) = commands::load_config(cli.api_url)?;
    logging::init_logging(cli.verbose, cli.quiet, &config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if let Commands::Config { cmd } = cli.command {
        let cmd = cmd.unwrap_or(ConfigCommands::Show);
        return config::run_config(cmd, &config, &config_file, output).await;
    }

    let session = Session::connect(config)?;
    match cli.command {
        Commands::Search { query, year, genre, min_rating, sort } => {
            let search = SearchQuery {
                query,
                year,
                genre,
                min_rating,
                sort,
            };
            catalog::run_search(&session, search, output).await
        }
        Commands::Trending => catalog::run_trending(&session, output).await,
        Commands::Movie { id } => catalog::run_movie(&session, id, output).await,
        Commands::Recommendations => catalog::run_recommendations(&session, output).await,
        Commands::Watchlist => watchlist::run_list(&session, output).await,
        Commands::Add { id } => watchlist::run_add(&session, id, output).await,
        Commands::Remove { id } => watchlist::run_remove(&session, id, output).await,
        Commands::Favourite { id } => watchlist::run_favourite(&session, id, output).await,
        Commands::Rate { id, stars } => watchlist::run_rate(&session, id, stars, output).await,
        Commands::Feedback { id, feedback } => watchlist::run_feedback(&session, id, feedback, output).await,
        // Handled before connecting
        Commands::Config { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let output = output::Output::new(cli.output, cli.quiet);

    if let Err(e) = run(cli, &output).await {
        let message = e.chain().map(|cause| cause.to_string()).collect::<Vec<_>>().join(": ");
        output.error(message);
        let retryable = e.downcast_ref::<SyncError>().map_or(false, SyncError::is_retryable)
            || e.downcast_ref::<ClientError>().map_or(false, ClientError::is_transport);
        if retryable {
            output.warn("The server could not be reached. Check it is running and try again.");
        }
        std::process::exit(1);
    }

    Ok(())
}
