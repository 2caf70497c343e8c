//! marquee - terminal movie browser.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use marquee_api::tmdb::{Movie, TmdbClient};
use marquee_api::trends::{TrendStore, TrendStoreClient};
use marquee_feed::{FetchErrorKind, FetchOutcome, MovieRequest};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TmdbConfig, TrendsConfig, resolve_config_path, resolve_log_path};
use crate::tui::run_browser;

/// User agent sent to every API.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "marquee", about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies in a full-screen terminal UI.
    Browse,
    /// Search movies by title.
    Search(SearchArgs),
    /// List popular movies.
    Discover(ListArgs),
    /// List the configured top-rated endpoint.
    TopRated(ListArgs),
    /// Show the most searched terms.
    Trending(TrendingArgs),
    /// Manage the configuration file.
    Config(ConfigCommand),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Maximum number of movies to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

/// Arguments for the listing subcommands.
#[derive(clap::Args)]
struct ListArgs {
    /// Maximum number of movies to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Number of entries (default: `trends.limit` from config).
    #[arg(long)]
    limit: Option<u32>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the config file path.
    Path,
    /// Write a config file with default settings.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Loads the config file, falling back to defaults when it is missing.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<(PathBuf, AppConfig)> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok((config_path, config))
}

/// Builds a `TmdbClient` from `TMDB_API_TOKEN` and the config.
///
/// # Errors
///
/// Returns an error if the token is missing or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(USER_AGENT);
    if let Some(base_url) = config.base_url()? {
        builder = builder.base_url(base_url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the trend store client, or `None` when trends are disabled.
///
/// # Errors
///
/// Returns an error if the store settings are incomplete or invalid.
#[instrument(skip_all)]
fn build_trend_client(config: &TrendsConfig) -> Result<Option<TrendStoreClient>> {
    if !config.enabled {
        return Ok(None);
    }

    let mut builder = TrendStoreClient::builder()
        .endpoint(config.endpoint_url()?)
        .project_id(&config.project_id)
        .database_id(&config.database_id)
        .collection_id(&config.collection_id)
        .user_agent(USER_AGENT);
    if let Ok(api_key) = std::env::var("MARQUEE_TRENDS_API_KEY") {
        builder = builder.api_key(api_key);
    }
    builder
        .build()
        .context("failed to build trend store client")
        .map(Some)
}

/// Turns a fetch outcome into movies; "no results" is not an error here.
fn into_movies(outcome: FetchOutcome) -> Result<Vec<Movie>> {
    match outcome {
        FetchOutcome::Loaded(movies) => Ok(movies),
        FetchOutcome::Failed(err) if err.kind == FetchErrorKind::NoResults => {
            tracing::info!("{err}");
            Ok(Vec::new())
        }
        FetchOutcome::Failed(err) => Err(err.into()),
    }
}

/// Prints up to `limit` movies.
fn log_movies(movies: &[Movie], limit: usize) {
    if movies.is_empty() {
        return;
    }
    tracing::info!("ID\tRating\t\tYear\tTitle\t\t\tPoster");
    for movie in movies.iter().take(limit) {
        tracing::info!(
            "{}\t{}\t\t{}\t{}\t\t\t{}",
            movie.id,
            movie.rating_label(),
            movie.year_label(),
            movie.title,
            movie.poster_url(),
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the clients fail to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let client = Arc::new(build_tmdb_client(&config.tmdb)?);
    let store = build_trend_client(&config.trends)?.map(Arc::new);

    tracing::info!(
        "Launching browser (trends {})...",
        if store.is_some() { "enabled" } else { "disabled" }
    );
    run_browser(client, store, &config)
        .await
        .context("movie browser TUI failed")
}

/// Runs the `search` subcommand.
///
/// Records the search in the trend store when trends are enabled and the
/// search found at least one movie.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;

    let request = MovieRequest::for_query(&args.query, &config.tmdb.language);
    let movies = into_movies(request.fetch(&client).await)?;
    log_movies(&movies, args.limit);

    if let (Some(term), Some(top)) = (request.search_term(), movies.first())
        && let Some(store) = build_trend_client(&config.trends)?
    {
        match store.record_search(term, top).await {
            Ok(()) => tracing::info!("Recorded search for {term}"),
            Err(err) => tracing::warn!("Error updating search count for {term}: {err:#}"),
        }
    }

    Ok(())
}

/// Runs the `discover` and `top-rated` subcommands.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_listing(top_rated: bool, args: &ListArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;

    let request = if top_rated {
        MovieRequest::Listing(config.tmdb.top_rated_endpoint.clone())
    } else {
        MovieRequest::for_query("", &config.tmdb.language)
    };
    let movies = into_movies(request.fetch(&client).await)?;
    log_movies(&movies, args.limit);

    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if trends are disabled or the store request fails.
#[instrument(skip_all)]
async fn run_trending(args: &TrendingArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (config_path, config) = load_config(dir)?;
    let Some(store) = build_trend_client(&config.trends)? else {
        bail!(
            "trend store is disabled; set trends.enabled = true in {}",
            config_path.display()
        );
    };

    let limit = args.limit.unwrap_or(config.trends.limit);
    let entries = store
        .top_searches(limit)
        .await
        .context("failed to fetch trending searches")?;

    if entries.is_empty() {
        tracing::info!("No searches recorded yet.");
        return Ok(());
    }

    tracing::info!("Rank\tCount\tTerm\t\tTitle");
    for (rank, entry) in (1_u32..).zip(&entries) {
        tracing::info!(
            "{}\t{}\t{}\t\t{}",
            rank,
            entry.count,
            entry.search_term,
            entry.title
        );
    }

    Ok(())
}

/// Runs the `config path` subcommand.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved.
fn run_config_path(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let state = if config_path.exists() {
        "exists"
    } else {
        "not created yet"
    };
    tracing::info!("{} ({state})", config_path.display());
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

/// Installs the tracing subscriber.
///
/// Logs go to stdout, or to `log_path` while the terminal UI owns the screen.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn init_tracing(log_path: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let fmt_layer = match log_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            fmt_layer
                .with_ansi(false)
                .with_writer(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => fmt_layer.with_writer(BoxMakeWriter::new(io::stdout)),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    #[cfg(feature = "otel")]
    let registry = {
        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });
        registry.with(otel_layer)
    };

    registry.init();
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        clap_complete::generate(
            args.shell,
            &mut Cli::command(),
            "marquee",
            &mut io::stdout(),
        );
        return Ok(());
    }

    let log_path = match cli.command {
        Commands::Browse => Some(
            resolve_log_path(cli.dir.as_ref()).context("failed to resolve log path")?,
        ),
        _ => None,
    };
    init_tracing(log_path.as_deref())?;

    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Browse => run_browse(dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Discover(args) => run_listing(false, &args, dir).await,
        Commands::TopRated(args) => run_listing(true, &args, dir).await,
        Commands::Trending(args) => run_trending(&args, dir).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Path => run_config_path(dir),
            ConfigSubcommands::Init(args) => run_config_init(&args, dir),
        },
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use marquee_feed::{FetchError, NO_MOVIES_FOUND};

    use super::*;

    #[test]
    fn test_cli_parses_search_defaults() {
        // Arrange & Act
        let cli = Cli::try_parse_from(["marquee", "search", "--query", "batman"]).unwrap();

        // Assert
        assert!(cli.dir.is_none());
        assert!(matches!(
            cli.command,
            Commands::Search(SearchArgs { ref query, limit: 20 }) if query == "batman"
        ));
    }

    #[test]
    fn test_cli_global_dir_after_subcommand() {
        // Arrange & Act
        let cli = Cli::try_parse_from(["marquee", "trending", "--limit", "3", "--dir", "/tmp/m"])
            .unwrap();

        // Assert
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/m")));
        assert!(matches!(
            cli.command,
            Commands::Trending(TrendingArgs { limit: Some(3) })
        ));
    }

    #[test]
    fn test_into_movies_treats_no_results_as_empty() {
        // Arrange
        let outcome =
            FetchOutcome::Failed(FetchError::new(FetchErrorKind::NoResults, NO_MOVIES_FOUND));

        // Act
        let movies = into_movies(outcome).unwrap();

        // Assert
        assert!(movies.is_empty());
    }

    #[test]
    fn test_into_movies_propagates_rejection() {
        // Arrange
        let outcome = FetchOutcome::Failed(FetchError::new(
            FetchErrorKind::Rejected,
            "Invalid API key",
        ));

        // Act
        let err = into_movies(outcome).unwrap_err();

        // Assert
        assert_eq!(err.to_string(), "Invalid API key");
    }
}
