mod menu;
mod report;
mod site;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelshelf_core::{
    load_config, load_config_or_default, validate_config, Config, ExternalCatalog, FuzzyMatcher,
    MatcherConfig, MovieStore, OmdbClient, SanitizedConfig, SqliteMovieStore,
};

use menu::{AppContext, Menu};

/// Default configuration file, looked up in the working directory.
const DEFAULT_CONFIG: &str = "reelshelf.toml";

#[derive(Parser)]
#[command(name = "reelshelf")]
#[command(about = "A personal movie catalog", version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "REELSHELF_CONFIG")]
    config: Option<PathBuf>,

    /// Database file (overrides the configuration)
    #[arg(short, long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive menu (default)
    Menu,
    /// List every movie
    List,
    /// Show rating statistics
    Stats,
    /// Fuzzy-search movie titles
    Search {
        /// Title or part of it
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Generate the static website
    Website,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so they never interleave with menu output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = load(&cli)?;
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    validate_config(&config).context("Configuration validation failed")?;

    match serde_json::to_string(&SanitizedConfig::from(&config)) {
        Ok(json) => debug!("Effective configuration: {}", json),
        Err(e) => debug!("Could not serialize configuration: {}", e),
    }

    let store = Arc::new(
        SqliteMovieStore::open(&config.database.path).with_context(|| {
            format!("Failed to open catalog at {:?}", config.database.path)
        })?,
    );
    info!("Movie catalog opened at {:?}", config.database.path);

    let lookup: Option<Arc<dyn ExternalCatalog>> = match &config.omdb {
        Some(omdb) if !omdb.api_key.is_empty() => Some(Arc::new(
            OmdbClient::new(omdb.clone()).context("Failed to create OMDb client")?,
        )),
        _ => {
            info!("No OMDb API key configured, adding movies is disabled");
            None
        }
    };

    let ctx = AppContext {
        store: store.clone(),
        lookup,
        matcher: FuzzyMatcher::with_config(MatcherConfig::from(&config.search)),
        website: config.website,
    };

    execute(&ctx, cli.command.unwrap_or(Command::Menu)).await?;
    drop(ctx);

    match Arc::try_unwrap(store) {
        Ok(store) => store.close().context("Failed to close catalog")?,
        Err(_) => debug!("Catalog still shared at exit, closing on drop"),
    }
    Ok(())
}

fn load(cli: &Cli) -> Result<Config> {
    match &cli.config {
        // An explicitly named file must exist
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG);
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))
        }
    }
}

async fn execute(ctx: &AppContext, command: Command) -> Result<()> {
    let snapshot = || ctx.store.list_all().context("Failed to read catalog");
    let mut stdout = io::stdout().lock();

    match command {
        Command::Menu => {
            let stdin = io::stdin().lock();
            Menu::new(ctx, stdin, stdout).run().await?;
            return Ok(());
        }
        Command::List => report::write_list(&mut stdout, &snapshot()?)?,
        Command::Stats => report::write_stats(&mut stdout, &snapshot()?)?,
        Command::Search { query } => {
            let query = query.join(" ");
            report::write_search(&mut stdout, &ctx.matcher, &query, &snapshot()?)?
        }
        Command::Website => {
            let path = site::generate(&snapshot()?, &ctx.website)?;
            writeln!(stdout, "Website was generated successfully: {}", path.display())?;
        }
    }

    stdout.flush()?;
    Ok(())
}
