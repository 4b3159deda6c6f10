pub mod challenge;
pub mod drink;
pub mod stats;
pub mod user;

use boozetrack_core::{Config, Database};

/// Open the database honoring the configured path override.
pub(crate) fn open_database(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::open()?,
    };
    Ok(db)
}

/// Resolve a username to its id.
pub(crate) fn resolve_user(
    db: &Database,
    name: &str,
) -> Result<i64, Box<dyn std::error::Error>> {
    db.user_id_by_name(name)?
        .ok_or_else(|| format!("no such user: {name}").into())
}
