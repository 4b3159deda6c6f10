use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "boozetrack-cli", version, about = "Boozetrack CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Drink logging
    Drink {
        #[command(subcommand)]
        action: commands::drink::DrinkAction,
    },
    /// Weekly challenges
    Challenges {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Points and drinking stats
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Drink { action } => commands::drink::run(action),
        Commands::Challenges { action } => commands::challenge::run(action),
        Commands::Stats { action } => commands::stats::run(action),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
