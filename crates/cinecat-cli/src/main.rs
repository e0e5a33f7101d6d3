//! cinecat - terminal movie catalog browser backed by TMDB.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{
    AppConfig, resolve_config_dir, resolve_config_path, resolve_credential, resolve_log_path,
};
use cinecat_api::tmdb::{
    Credential, MoviePage, PopularMoviesParams, SearchMovieParams, TmdbApi, TmdbClient,
};
use cinecat_screens::ApiConfig;
use cinecat_screens::error::MISSING_CREDENTIAL_MESSAGE;
use cinecat_screens::view::{
    MovieCard, MovieDetailsCard, RELEASE_LABEL, SYNOPSIS_LABEL, VOTE_LABEL,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Response language (default: config value, then "pt-BR").
    #[arg(long, global = true)]
    language: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse popular movies and search interactively.
    Browse,
    /// Print one page of popular movies.
    Popular(PopularArgs),
    /// Print one page of movie search results.
    Search(SearchArgs),
    /// Print details for one movie.
    Details(DetailsArgs),
    /// Inspect or change settings.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `popular` subcommand.
#[derive(clap::Args)]
struct PopularArgs {
    /// Result page.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "matrix").
    #[arg(long, required = true)]
    query: String,
    /// Result page.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
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
    /// Show the config file location and current settings.
    Show,
    /// Persist settings to the config file (the language comes from `--language`).
    Set(ConfigSetArgs),
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// TMDB v3 API key.
    #[arg(long)]
    api_key: Option<String>,
    /// TMDB v4 read access token.
    #[arg(long)]
    api_token: Option<String>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Effective TMDB settings after merging flags, environment, and config.
struct Settings {
    /// Credential, if any was configured.
    credential: Option<Credential>,
    /// Response language.
    language: String,
}

/// Loads the config file and resolves the effective settings.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_settings(dir: Option<&Path>, language: Option<&str>) -> Result<Settings> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let credential = resolve_credential(&config.tmdb, |name| std::env::var(name).ok());
    let language = language
        .filter(|lang| !lang.trim().is_empty())
        .unwrap_or_else(|| config.tmdb.language_or_default())
        .to_owned();

    Ok(Settings {
        credential,
        language,
    })
}

/// Builds a `TmdbClient` with default user agent.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(credential: Credential) -> Result<TmdbClient> {
    TmdbClient::builder()
        .credential(credential)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Builds a client for the printing subcommands.
///
/// # Errors
///
/// Returns the configuration message if no credential is configured.
fn require_client(settings: Settings) -> Result<(TmdbClient, String)> {
    let Some(credential) = settings.credential else {
        bail!(MISSING_CREDENTIAL_MESSAGE);
    };
    Ok((build_tmdb_client(credential)?, settings.language))
}

/// Prints one list page.
fn print_page(page: &MoviePage) {
    tracing::info!("ID\tTitle\t\t\tPoster");
    for movie in &page.results {
        let card = MovieCard::from_summary(movie);
        tracing::info!("{}\t{}\t{}", card.id, card.title, card.poster_label());
    }
    tracing::info!(
        "Page {} / {} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if no credential is configured or the API request fails.
#[instrument(skip_all)]
async fn run_popular(args: &PopularArgs, settings: Settings) -> Result<()> {
    let (client, language) = require_client(settings)?;

    let params = PopularMoviesParams::new(args.page).language(language);
    let page = client
        .popular_movies(&params)
        .await
        .context("TMDB movie/popular request failed")?;

    print_page(&page);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if no credential is configured or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, settings: Settings) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        bail!("--query must not be blank");
    }
    let (client, language) = require_client(settings)?;

    let params = SearchMovieParams::new(query)
        .language(language)
        .page(args.page);
    let page = client
        .search_movies(&params)
        .await
        .context("TMDB search/movie request failed")?;

    if page.results.is_empty() {
        tracing::info!("{}", cinecat_screens::view::NO_MOVIES_FOUND);
        return Ok(());
    }
    print_page(&page);
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if no credential is configured or the API request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, settings: Settings) -> Result<()> {
    let (client, language) = require_client(settings)?;

    let details = client
        .movie_details(args.id, &language)
        .await
        .context("TMDB movie details request failed")?;
    let card = MovieDetailsCard::from_details(&details);

    tracing::info!("ID: {}", card.id);
    tracing::info!("Title: {}", card.title);
    tracing::info!("{RELEASE_LABEL} {}", card.release_date);
    tracing::info!("{VOTE_LABEL} {}", card.vote_average);
    tracing::info!(
        "Poster: {}",
        card.poster_url.as_deref().unwrap_or(cinecat_screens::view::NO_IMAGE)
    );
    tracing::info!("TMDB: {}", card.page_url);
    tracing::info!("{SYNOPSIS_LABEL}: {}", card.overview);

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// A missing credential is not fatal here: the browser shows it on screen.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(settings: Settings) -> Result<()> {
    let config = match settings.credential {
        Some(credential) => ApiConfig::new(build_tmdb_client(credential)?),
        None => {
            tracing::warn!("no TMDB credential configured");
            ApiConfig::missing_credential()
        }
    }
    .with_language(settings.language);

    tracing::info!(language = config.language(), "launching browser");
    crate::tui::run_browser(config)
        .await
        .context("movie browser TUI failed")
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be resolved or parsed.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&Path>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let presence = |value: Option<&String>| if value.is_some() { "(set)" } else { "(not set)" };
    tracing::info!("Config file: {}", config_path.display());
    tracing::info!("api_key: {}", presence(config.tmdb.api_key.as_ref()));
    tracing::info!("api_token: {}", presence(config.tmdb.api_token.as_ref()));
    tracing::info!("language: {}", config.tmdb.language_or_default());

    Ok(())
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if no setting is given or the config file cannot be written.
#[instrument(skip_all)]
fn run_config_set(args: ConfigSetArgs, language: Option<String>, dir: Option<&Path>) -> Result<()> {
    if args.api_key.is_none() && args.api_token.is_none() && language.is_none() {
        bail!("nothing to set; pass --api-key, --api-token, or --language");
    }

    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;
    if let Some(api_key) = args.api_key {
        config.tmdb.api_key = Some(api_key);
    }
    if let Some(api_token) = args.api_token {
        config.tmdb.api_token = Some(api_token);
    }
    if let Some(language) = language {
        config.tmdb.language = Some(language);
    }
    config.save(&config_path).context("failed to save config")?;

    tracing::info!("Saved settings to {}", config_path.display());
    Ok(())
}

/// Opens the browser log file for appending, creating the directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
fn open_log_file(dir: Option<&Path>) -> Result<File> {
    let config_dir = resolve_config_dir(dir).context("failed to resolve config directory")?;
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("failed to create directory {}", config_dir.display()))?;
    let log_path = resolve_log_path(dir).context("failed to resolve log path")?;
    File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))
}

/// Installs the global tracing subscriber.
///
/// Logs go to `log_file` when given (the browser owns the terminal),
/// otherwise to stdout.
fn init_tracing(log_file: Option<File>) {
    let ansi = log_file.is_none();
    let writer = log_file.map_or_else(
        || BoxMakeWriter::new(io::stdout),
        |file| BoxMakeWriter::new(Mutex::new(file)),
    );

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

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

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_deref();

    let log_file = if matches!(cli.command, Commands::Browse) {
        Some(open_log_file(dir)?)
    } else {
        None
    };
    init_tracing(log_file);

    match cli.command {
        Commands::Browse => run_browse(load_settings(dir, cli.language.as_deref())?).await,
        Commands::Popular(args) => {
            run_popular(&args, load_settings(dir, cli.language.as_deref())?).await
        }
        Commands::Search(args) => {
            run_search(&args, load_settings(dir, cli.language.as_deref())?).await
        }
        Commands::Details(args) => {
            run_details(&args, load_settings(dir, cli.language.as_deref())?).await
        }
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Set(args) => run_config_set(args, cli.language, dir),
        },
        Commands::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "cinecat", &mut io::stdout());
            Ok(())
        }
    }
}
