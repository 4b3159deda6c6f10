use clap::Subcommand;
use serde::Serialize;

use boozetrack_core::Config;

use super::open_database;

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Add { name: String },
    /// List all users
    List,
}

#[derive(Serialize)]
struct UserRow {
    id: i64,
    name: String,
    points: i64,
    active_challenges: usize,
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_database(&config)?;

    match action {
        UserAction::Add { name } => {
            let user = db.add_user(&name)?;
            println!("User created: {} (id {})", user.name, user.id);
        }
        UserAction::List => {
            let rows: Vec<UserRow> = db
                .list_users()?
                .into_iter()
                .map(|u| UserRow {
                    id: u.id,
                    name: u.name,
                    points: u.points,
                    active_challenges: u.active_challenges.len(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
