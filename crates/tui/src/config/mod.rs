use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/inventory_tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API root; collection paths are appended to it.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_file: String,
    /// Section shown on startup (`items`, `categories`, `units`, `vendors`,
    /// `warehouses`).
    pub start_section: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api/".to_string(),
            request_timeout_secs: 15,
            log_level: "info".to_string(),
            log_file: "logs/inventory_tui.log".to_string(),
            start_section: "items".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "inventory_tui", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the API root (e.g. http://127.0.0.1:3000/api/).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override the section shown on startup.
    #[arg(long)]
    start_section: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_from(Args::parse())
}

pub fn load_from(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("INVENTORY_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(start_section) = args.start_section {
        settings.start_section = start_section;
    }

    Ok(settings)
}
