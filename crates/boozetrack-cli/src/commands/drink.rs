use chrono::{DateTime, Utc};
use clap::Subcommand;

use boozetrack_core::Config;

use super::{open_database, resolve_user};

#[derive(Subcommand)]
pub enum DrinkAction {
    /// Log a drink
    Add {
        #[arg(long)]
        user: String,
        /// When it was drunk (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// List logged drinks, oldest first
    List {
        #[arg(long)]
        user: String,
    },
    /// Remove a logged drink by id
    Remove {
        #[arg(long)]
        user: String,
        id: i64,
    },
}

pub fn run(action: DrinkAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_database(&config)?;

    match action {
        DrinkAction::Add { user, at } => {
            let user_id = resolve_user(&db, &user)?;
            let drank_at = match at {
                Some(raw) => DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc),
                None => Utc::now(),
            };
            let id = db.add_drink(user_id, drank_at)?;
            println!("Drink logged: id {id} at {}", drank_at.to_rfc3339());
        }
        DrinkAction::List { user } => {
            let user_id = resolve_user(&db, &user)?;
            let drinks = db.drinks_for_user(user_id)?;
            println!("{}", serde_json::to_string_pretty(&drinks)?);
        }
        DrinkAction::Remove { user, id } => {
            let user_id = resolve_user(&db, &user)?;
            if db.remove_drink(user_id, id)? {
                println!("Drink {id} removed");
            } else {
                return Err(format!("no drink {id} for user {user}").into());
            }
        }
    }
    Ok(())
}
