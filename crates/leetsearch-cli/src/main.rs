//! LeetSearch CLI
//!
//! Unified entry point for LeetSearch. Provides:
//! - Default: start the terminal popup
//! - One-shot search with text, HTML or JSON output
//! - Backend URL management and backend diagnostics

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use leetsearch_core::backend::HttpBackend;
use leetsearch_core::config::{
    BACKEND_URL_KEY, ConfigStore, DEFAULT_BACKEND_URL, Directories, FileStore, MemoryStore,
    backend_base_or_default,
};
use leetsearch_core::filter::filter_users;
use leetsearch_core::view::{HtmlSurface, Notice, PopupState, UserCard, ids};
use leetsearch_core::{
    MAX_REFRESH_PAGES, MAX_REFRESH_USERS, PopupController, Profile, RefreshRequest, SearchOutcome,
    UserRecord,
};
use std::path::PathBuf;
use std::process::{Command, ExitCode};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Find a binary, preferring the dev build next to this executable if it exists
fn find_binary(name: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let dev_binary = dir.join(name);
        if dev_binary.exists() {
            return dev_binary;
        }
    }
    PathBuf::from(name)
}

/// Run a binary in the foreground, bailing on failure
fn run_foreground(name: &str, args: &[String]) -> Result<()> {
    let binary = find_binary(name);
    let status = Command::new(&binary)
        .args(args)
        .status()
        .with_context(|| format!("Failed to start {}. Is it installed?", binary.display()))?;
    if !status.success() {
        bail!("{name} exited with status: {status}");
    }
    Ok(())
}

/// LeetSearch CLI
#[derive(Parser)]
#[command(name = "leetsearch")]
#[command(about = "LeetSearch - find LeetCode profiles by college")]
#[command(version)]
#[command(after_help = "\
Examples:
  leetsearch                              Start the terminal popup
  leetsearch tui stanford                 Start the popup and search right away
  leetsearch search mit                   Print matching profiles
  leetsearch search mit --filter canada   Only profiles mentioning canada
  leetsearch search mit --format json     Machine-readable output
  leetsearch config set http://host:8000  Point at another backend
  leetsearch --backend http://host:8000 search mit
  leetsearch health                       Check the backend
  leetsearch profile alice --refresh      Refetch one profile
  leetsearch refresh --pages 3            Start a backend scrape cycle
")]
struct Cli {
    /// Backend base URL for this run only (not saved)
    #[arg(long, global = true, value_name = "URL")]
    backend: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal popup
    Tui {
        /// College name to search for right away
        query: Option<String>,
    },

    /// Search once and print the results
    Search {
        /// College name
        query: String,

        /// Narrow the results by username, name or country
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show or change the stored backend URL
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Show backend status
    Health,

    /// Show one cached profile
    Profile {
        username: String,

        /// Ask the backend to refetch the profile first
        #[arg(long)]
        refresh: bool,
    },

    /// Start a background scrape cycle on the backend
    Refresh {
        /// Contest ranking pages to scrape (1-10)
        #[arg(long, default_value_t = RefreshRequest::default().pages,
              value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_REFRESH_PAGES)))]
        pages: u8,

        /// Profiles to fetch from those pages (1-200)
        #[arg(long, default_value_t = RefreshRequest::default().max_users,
              value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_REFRESH_USERS)))]
        max_users: u16,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the backend URL in use
    Show,

    /// Store a new backend URL
    Set { url: String },

    /// Restore the default backend URL
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let backend = cli.backend;
    match cli.command {
        None => run_tui(backend.as_deref(), None).map(|()| ExitCode::SUCCESS),
        Some(Commands::Tui { query }) => {
            run_tui(backend.as_deref(), query.as_deref()).map(|()| ExitCode::SUCCESS)
        }
        Some(Commands::Search {
            query,
            filter,
            format,
        }) => {
            let http = HttpBackend::new()?;
            match backend {
                Some(url) => {
                    let store = MemoryStore::with_value(BACKEND_URL_KEY, &url);
                    run_search(store, http, &query, filter.as_deref(), format).await
                }
                None => run_search(file_store()?, http, &query, filter.as_deref(), format).await,
            }
        }
        Some(Commands::Config { command }) => {
            run_config(command).await.map(|()| ExitCode::SUCCESS)
        }
        Some(Commands::Health) => run_health(backend).await.map(|()| ExitCode::SUCCESS),
        Some(Commands::Profile { username, refresh }) => run_profile(backend, &username, refresh)
            .await
            .map(|()| ExitCode::SUCCESS),
        Some(Commands::Refresh { pages, max_users }) => {
            run_refresh(backend, RefreshRequest { pages, max_users })
                .await
                .map(|()| ExitCode::SUCCESS)
        }
    }
}

fn file_store() -> Result<FileStore> {
    let dirs = Directories::new()?;
    Ok(FileStore::new(dirs.storage_file))
}

/// Base URL from `--backend`, or the stored one with the popup's fallback.
async fn resolve_base(backend: Option<String>) -> Result<String> {
    if let Some(url) = backend {
        return Ok(url);
    }
    Ok(backend_base_or_default(&file_store()?).await)
}

fn run_tui(backend: Option<&str>, query: Option<&str>) -> Result<()> {
    let mut args = Vec::new();
    if let Some(url) = backend {
        args.extend(["--backend".to_string(), url.to_string()]);
    }
    if let Some(query) = query {
        args.push(query.to_string());
    }
    run_foreground("leetsearch-tui", &args)
}

async fn run_search<S: ConfigStore>(
    store: S,
    backend: HttpBackend,
    query: &str,
    filter: Option<&str>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let mut controller = PopupController::new(store, backend, HtmlSurface::new());

    let outcome = controller.search(query).await;
    if let (Some(text), SearchOutcome::Loaded { .. }) = (filter, &outcome) {
        controller.apply_filter(text);
    }

    match format {
        OutputFormat::Html => println!("{}", controller.view().inner_html(ids::RESULTS)),
        OutputFormat::Json => {
            let users = filter_users(controller.current_results(), filter.unwrap_or_default());
            println!("{}", json_report(controller.state(), &users)?);
        }
        OutputFormat::Text => print!("{}", text_report(controller.state())),
    }

    Ok(match outcome {
        SearchOutcome::Failed(e) => {
            tracing::debug!("Search failed: {}", e);
            ExitCode::FAILURE
        }
        SearchOutcome::EmptyQuery | SearchOutcome::Loaded { .. } => ExitCode::SUCCESS,
    })
}

/// JSON array of the shown records, or `{"error": ...}` when the search
/// never produced a result set.
fn json_report(state: &PopupState, users: &[&UserRecord]) -> serde_json::Result<String> {
    match state.results.notice() {
        Some(notice @ (Notice::EnterQuery | Notice::FetchFailed)) => {
            serde_json::to_string_pretty(&serde_json::json!({ "error": notice.text() }))
        }
        Some(Notice::NoUsers) | None => serde_json::to_string_pretty(users),
    }
}

/// Plain-text rendering of the results pane followed by the stats line.
fn text_report(state: &PopupState) -> String {
    let mut out = String::new();

    if let Some(notice) = state.results.notice() {
        out.push_str(notice.text());
        out.push('\n');
    }
    for card in state.results.cards() {
        out.push_str(&card_text(card));
    }
    if let Some(stats) = &state.stats {
        out.push_str(&format!(
            "{} | {} | {}\n",
            stats.matched_label(),
            stats.filtered_label(),
            stats.refreshed_label()
        ));
    }
    out
}

fn card_text(card: &UserCard) -> String {
    format!(
        "{}  Rank: {}\n  {} · {}\n  {}\n  {}\n\n",
        card.username, card.rank, card.display_name, card.country, card.school, card.profile_url
    )
}

async fn run_config(command: ConfigCommand) -> Result<()> {
    let store = file_store()?;

    match command {
        ConfigCommand::Show => {
            let url = backend_base_or_default(&store).await;
            println!("Backend URL: {url}");
            println!("Stored in:   {}", store.path().display());
        }
        ConfigCommand::Set { url } => {
            leetsearch_core::backend::endpoint(&url, &[])
                .with_context(|| format!("Not a usable backend URL: {url}"))?;
            store.set(BACKEND_URL_KEY, &url).await?;
            println!("Backend URL set to {url}");
        }
        ConfigCommand::Reset => {
            store.set(BACKEND_URL_KEY, DEFAULT_BACKEND_URL).await?;
            println!("Backend URL reset to {DEFAULT_BACKEND_URL}");
        }
    }
    Ok(())
}

async fn run_health(backend: Option<String>) -> Result<()> {
    let base = resolve_base(backend).await?;
    let health = HttpBackend::new()?
        .health(&base)
        .await
        .with_context(|| format!("Backend at {base} is not reachable"))?;

    println!("Backend:         {base}");
    println!("Status:          {}", health.status);
    println!("Profiles cached: {}", health.profiles_cached);
    match health.last_updated {
        Some(at) => println!("Last updated:    {}", at.to_rfc3339()),
        None => println!("Last updated:    never"),
    }
    Ok(())
}

async fn run_profile(backend: Option<String>, username: &str, refresh: bool) -> Result<()> {
    let base = resolve_base(backend).await?;
    let response = HttpBackend::new()?
        .profile(&base, username, refresh)
        .await
        .with_context(|| format!("Failed to fetch profile for {username}"))?;

    print!("{}", profile_text(&response.profile));
    if response.cached {
        println!("(cached)");
    }
    Ok(())
}

async fn run_refresh(backend: Option<String>, request: RefreshRequest) -> Result<()> {
    let base = resolve_base(backend).await?;
    let response = HttpBackend::new()?
        .refresh(&base, request)
        .await
        .with_context(|| format!("Backend at {base} refused the refresh"))?;

    if response.started {
        println!(
            "{} ({} pages, up to {} profiles)",
            response.message, response.pages, response.max_users
        );
    } else {
        println!("Refresh not started: {}", response.message);
    }
    Ok(())
}

fn profile_text(profile: &Profile) -> String {
    let mut out = format!("{}\n", profile.username);
    let fields = [
        ("Name", profile.real_name.as_deref()),
        ("Country", profile.country_name.as_deref()),
        ("School", profile.school.as_deref()),
        ("Company", profile.company.as_deref()),
        ("About", profile.about_me.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.push_str(&format!("  {label}: {value}\n"));
        }
    }
    if let Some(ranking) = profile.ranking {
        out.push_str(&format!(
            "  Rank: {}\n",
            leetsearch_core::view::format_ranking(Some(ranking))
        ));
    }
    for site in &profile.websites {
        out.push_str(&format!("  {site}\n"));
    }
    out
}
