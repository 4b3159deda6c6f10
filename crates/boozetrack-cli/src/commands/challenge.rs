use std::sync::Arc;

use clap::Subcommand;

use boozetrack_core::{ChallengeManager, Config, TemplateCatalog};

use super::{open_database, resolve_user};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Show the current challenge set, generating or rolling over as due
    Show {
        #[arg(long)]
        user: String,
    },
    /// List the challenge template catalog
    Catalog,
}

fn load_catalog(config: &Config) -> Result<TemplateCatalog, Box<dyn std::error::Error>> {
    let catalog = match &config.catalog_path {
        Some(path) => TemplateCatalog::load(path)?,
        None => TemplateCatalog::builtin()?,
    };
    Ok(catalog)
}

pub fn run(action: ChallengeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        ChallengeAction::Show { user } => {
            let db = Arc::new(open_database(&config)?);
            let user_id = resolve_user(&db, &user)?;
            let manager = ChallengeManager::new(
                Arc::new(load_catalog(&config)?),
                db.clone(),
                db.clone(),
                config.rng_seed,
            );
            let outcome = manager.manage(user_id)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        ChallengeAction::Catalog => {
            let catalog = load_catalog(&config)?;
            println!("{}", serde_json::to_string_pretty(catalog.all())?);
        }
    }
    Ok(())
}
