mod api;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod services;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::DataConfig;
use crate::models::AnalyzeBetRequest;

#[derive(Parser)]
#[command(name = "statline")]
#[command(about = "Player stat lines and opponent defense lookups for basketball props")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// List all teams
    Teams,
    /// List the players on a team
    Players {
        #[arg(short, long)]
        team: String,
    },
    /// List the stat categories in the players table
    Columns,
    /// Compare a betting line with a player's average
    Analyze {
        #[arg(short, long)]
        team: String,
        #[arg(short = 'P', long)]
        player: String,
        #[arg(short, long)]
        stat: String,
        #[arg(short, long)]
        line: f64,
        #[arg(short, long)]
        opponent: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = DataConfig::from_env();

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting Statline API server on port {}", port);
            api::serve(port, config).await?;
        }
        Some(Commands::Teams) => {
            cli::show_teams()?;
        }
        Some(Commands::Players { team }) => {
            tracing::info!("Listing players for: {}", team);
            cli::show_players(&config, &team)?;
        }
        Some(Commands::Columns) => {
            cli::show_stat_columns(&config)?;
        }
        Some(Commands::Analyze {
            team,
            player,
            stat,
            line,
            opponent,
        }) => {
            let request = AnalyzeBetRequest {
                team,
                player,
                stat,
                line,
                opponent,
            };
            cli::analyze_bet(&config, request)?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting Statline API server on port 3000");
            api::serve(3000, config).await?;
        }
    }

    Ok(())
}
