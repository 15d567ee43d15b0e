use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use scrollscholar::app::{App, AppEvent};
use scrollscholar::config::Config;
use scrollscholar::feed::{ArticleSource, JsonFileSource, SampleSource};
use scrollscholar::topics::SimulatedStore;
use scrollscholar::ui;

/// Get the config directory path (~/.config/scrollscholar/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("scrollscholar");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(
    name = "scrollscholar",
    about = "Infinite-scroll knowledge articles in your terminal"
)]
struct Args {
    /// Config file (default: ~/.config/scrollscholar/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Browse articles from a JSON file instead of the bundled sample
    #[arg(long, value_name = "FILE")]
    articles: Option<PathBuf>,

    /// Seed Knowledge Roulette for a reproducible jump sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of topics that can be selected at once
    #[arg(long, value_name = "N")]
    max_selected: Option<usize>,
}

/// Log to a file in the config directory when RUST_LOG is set.
///
/// The terminal belongs to the TUI, so nothing may be written to stderr
/// while it runs.
fn init_tracing(config_dir: &std::path::Path) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let log_path = config_dir.join("scrollscholar.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    init_tracing(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    // Command-line flags win over the config file
    if let Some(path) = args.articles {
        config.articles_file = Some(path);
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(max) = args.max_selected {
        config.max_selected = max;
    }
    config.validate().context("Invalid configuration")?;

    let source: Arc<dyn ArticleSource> = match &config.articles_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading articles from file");
            Arc::new(JsonFileSource::new(path.clone()))
        }
        None => Arc::new(SampleSource::new(config.load_delay())),
    };
    let store = Arc::new(SimulatedStore::new(config.save_delay()));

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    let mut app =
        App::new(&config, source, store, event_tx).context("Failed to create application")?;

    // Run the TUI
    ui::run(&mut app, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
