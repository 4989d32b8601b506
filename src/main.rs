//! # robodash - Terminal admin dashboard for an IoT measurement robot
//!
//! Browses the backend's alert logs, command history, RFID tags, obstacle
//! logs, robot status, work plans and collected measurements, shows live
//! Socket.IO events as toasts, and drives the robot from the keyboard.

#[macro_use]
extern crate rust_i18n;

// Load locale files from `locales/` directory, default to English
i18n!("locales", fallback = "en");

mod alerts;
mod api;
mod app;
mod commands;
mod config;
pub mod constants;
mod forms;
mod logging;
mod models;
mod normalize;
mod notifications;
mod realtime;
mod screens;
mod ui;
mod utils;

use anyhow::Result;
use clap::Parser;

use config::{normalize_base_url, Config};
use constants::{env_file_path, log_file_path, MAX_PAGE_SIZE};

/// robodash - terminal dashboard for the measurement robot backend
#[derive(Parser, Debug)]
#[command(name = "robodash", version, about = "Terminal admin dashboard for an IoT measurement robot")]
struct Cli {
    /// Backend REST base URL (e.g. "http://robot.local:3000")
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Socket.IO server URL for live events
    #[arg(long, value_name = "URL")]
    realtime_url: Option<String>,

    /// Items per page on every list screen
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,

    /// Color theme (default, gruvbox, nord, dracula, or a file under ~/.config/robodash/themes)
    #[arg(long, short = 't')]
    theme: Option<String>,

    /// UI language (en, vi)
    #[arg(long, short = 'l', value_name = "LANG")]
    lang: Option<String>,

    /// Do not connect to the realtime event server
    #[arg(long)]
    no_realtime: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment overrides: ~/.config/robodash/.env first, then ./.env
    let _ = dotenvy::from_path(env_file_path());
    let _ = dotenvy::dotenv();

    // The terminal belongs to the TUI, so logs go to a file.
    if let Err(e) = logging::init(&log_file_path()) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    // Load and apply CLI overrides to config
    let mut config = Config::load();
    if let Some(ref url) = cli.api_url {
        config.api_base_url = normalize_base_url(url);
    }
    if let Some(ref url) = cli.realtime_url {
        config.realtime.url = normalize_base_url(url);
    }
    if let Some(size) = cli.page_size {
        config.page_size = size.clamp(1, MAX_PAGE_SIZE);
    }
    if let Some(ref theme_name) = cli.theme {
        config.theme = theme_name.clone();
    }
    if let Some(ref lang) = cli.lang {
        config.lang = lang.clone();
    }
    if cli.no_realtime {
        config.realtime.enabled = false;
    }

    tracing::info!(
        api = %config.api_base_url,
        realtime = %config.realtime.url,
        page_size = config.page_size,
        "starting robodash"
    );

    // Set UI language (CLI > config > default "en")
    rust_i18n::set_locale(&config.lang);

    // Build and run the application
    let mut app = app::App::new(&config)?;
    app.run().await
}
