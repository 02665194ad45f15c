mod app;
mod client;
mod config;
mod error;
mod ui;

use std::{fs, path::Path, sync::Mutex};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_logging(&config)?;
    tracing::info!(base_url = %config.base_url, "starting inventory console");

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(config: &AppConfig) -> Result<()> {
    let path = Path::new(&config.log_file);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "inventory_tui={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
