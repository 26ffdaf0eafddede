use anyhow::Result;

use crate::config::DataConfig;
use crate::db::{abbreviation_for, full_name_for, suggest_team, StatsStore};
use crate::error::StatsError;
use crate::models::AnalyzeBetRequest;
use crate::services::{list_players, list_teams, BetAnalyzer};

pub fn show_teams() -> Result<()> {
    println!("🏀 Teams:\n");
    for (i, team) in list_teams().iter().enumerate() {
        println!("{:>2}. {}", i + 1, team);
    }
    Ok(())
}

pub fn show_players(config: &DataConfig, team: &str) -> Result<()> {
    let store = StatsStore::load(config)?;

    // Accept "BOS" as well as "Boston Celtics"
    let team = full_name_for(&team.to_uppercase()).unwrap_or(team);

    if abbreviation_for(team).is_none() {
        println!("❌ Unknown team: '{}'", team);
        if let Some(suggestion) = suggest_team(team) {
            println!("💡 Did you mean '{}'?", suggestion);
        }
        return Ok(());
    }

    let roster = list_players(&store, Some(team));
    if roster.is_empty() {
        println!("📭 No players found for {}", team);
        return Ok(());
    }

    println!("📋 {} ({} players):\n", team, roster.len());
    for player in roster {
        println!("   • {}", player);
    }
    Ok(())
}

pub fn show_stat_columns(config: &DataConfig) -> Result<()> {
    let store = StatsStore::load(config)?;

    println!("📊 Stat categories:\n");
    for column in store.stat_columns() {
        println!("   • {}", column);
    }
    Ok(())
}

pub fn analyze_bet(config: &DataConfig, request: AnalyzeBetRequest) -> Result<()> {
    let store = StatsStore::load(config)?;

    println!(
        "🔍 Analyzing {} {} line {} vs {}...\n",
        request.player, request.stat, request.line, request.opponent
    );

    match BetAnalyzer::new(&store).analyze(&request) {
        Ok(analysis) => {
            println!("📊 Analysis:");
            println!("   Player: {}", analysis.player);
            println!("   Stat: {}", analysis.stat);
            println!("   Average: {:.2}", analysis.player_avg);
            println!("   Assessment: {}", analysis.assessment);
            println!("   Impact: {}", analysis.impact);
        }
        Err(StatsError::InvalidInput) => {
            println!("❌ {}", StatsError::InvalidInput);
            if abbreviation_for(&request.team).is_none() {
                if let Some(suggestion) = suggest_team(&request.team) {
                    println!("💡 Did you mean '{}'?", suggestion);
                }
            }
        }
        Err(e) => {
            println!("❌ {}", e);
            if let StatsError::UnknownStat { .. } = e {
                println!("💡 Use 'statline columns' to list stat categories");
            }
        }
    }

    Ok(())
}
