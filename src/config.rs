use std::env;
use std::path::PathBuf;

pub const PLAYER_STATS_ENV: &str = "PLAYER_STATS_CSV";
pub const TEAM_STATS_ENV: &str = "TEAM_STATS_CSV";
pub const GAME_STATS_ENV: &str = "GAME_STATS_CSV";
pub const STATIC_DIR_ENV: &str = "STATIC_DIR";

/// Where the stat tables and the landing page live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub players_path: PathBuf,
    pub teams_path: PathBuf,
    pub games_path: PathBuf,
    pub static_dir: PathBuf,
}

impl DataConfig {
    pub fn from_env() -> Self {
        Self {
            players_path: path_from_env(PLAYER_STATS_ENV, "data/player_Stats.csv"),
            teams_path: path_from_env(TEAM_STATS_ENV, "data/team_Stats.csv"),
            games_path: path_from_env(GAME_STATS_ENV, "data/game_stats.csv"),
            static_dir: path_from_env(STATIC_DIR_ENV, "static"),
        }
    }

    pub fn index_page(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

fn path_from_env(var: &str, default: &str) -> PathBuf {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
