use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use storefront::app::{App, AppEvent};
use storefront::catalog::{CatalogClient, DEFAULT_API_BASE};
use storefront::config::Config;
use storefront::logging;
use storefront::theme::ThemeVariant;
use storefront::ui;
use storefront::util::validate_api_base;

/// Default config file path (~/.config/storefront/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("storefront")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Browse the DummyJSON product catalog in your terminal")]
struct Args {
    /// Product API base URL
    #[arg(long, value_name = "URL", env = "STOREFRONT_API_BASE")]
    api_base: Option<String>,

    /// Config file to use instead of ~/.config/storefront/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Color theme (dark or light)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Append logs to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "PATH", env = "STOREFRONT_LOG")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // CLI flag / env var > config file > default
    let api_base = args
        .api_base
        .or_else(|| config.api_base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let base_url = validate_api_base(&api_base)
        .with_context(|| format!("Invalid API base URL '{}'", api_base))?;
    tracing::info!(base = %base_url, "Using product API");

    let client = CatalogClient::new(base_url, Duration::from_secs(config.request_timeout_secs))
        .context("Failed to create HTTP client")?;

    let mut app = App::new(client.clone(), config.keywords.clone());

    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    match ThemeVariant::from_str_name(theme_name) {
        Some(variant) => app.set_theme(variant),
        None => {
            tracing::warn!(theme = %theme_name, "Unknown theme, using dark");
            eprintln!("Warning: unknown theme '{}', using dark", theme_name);
        }
    }

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Category discovery runs once, alongside the first page fetch
    let _ = ui::spawn_category_fetch(client, event_tx.clone());

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
