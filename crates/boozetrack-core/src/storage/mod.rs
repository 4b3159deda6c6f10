mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, DrinkRecord};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/boozetrack[-dev]/` based on BOOZETRACK_ENV.
///
/// Set BOOZETRACK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BOOZETRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("boozetrack-dev")
    } else {
        base_dir.join("boozetrack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
