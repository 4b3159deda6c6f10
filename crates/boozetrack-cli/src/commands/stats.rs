use chrono::{Duration, Utc};
use clap::Subcommand;
use serde::Serialize;

use boozetrack_core::{Config, DrinkHistory, UserStore, CHALLENGE_WINDOW_DAYS};

use super::{open_database, resolve_user};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Booze points and trailing-week drink count
    Show {
        #[arg(long)]
        user: String,
    },
}

#[derive(Serialize)]
struct Stats {
    user: String,
    points: i64,
    drinks_last_week: i64,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_database(&config)?;

    match action {
        StatsAction::Show { user } => {
            let user_id = resolve_user(&db, &user)?;
            let record = db.load(user_id)?;
            let now = Utc::now();
            let drinks_last_week =
                db.count_in_window(user_id, now - Duration::days(CHALLENGE_WINDOW_DAYS), now)?;
            let stats = Stats {
                user: record.name,
                points: record.points,
                drinks_last_week,
            };
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
