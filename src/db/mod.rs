pub mod teams;
pub use teams::{abbreviation_for, full_name_for, full_names, suggest_team};

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use statrs::statistics::Statistics;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::DataConfig;
use crate::error::{Result, StatsError};
use crate::models::{DefenseMetrics, GameRecord, PlayerRecord, TeamDefense};

const TEAM_COLUMN: &str = "Team";
const PLAYER_COLUMN: &str = "Player";
const DRTG_COLUMN: &str = "DRtg";
const EFG_COLUMN: &str = "eFG%";

/// Read-only tables, indexed once at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct StatsStore {
    players_by_team: HashMap<String, Vec<PlayerRecord>>,
    player_names: HashSet<String>,
    stat_columns: BTreeSet<String>,
    player_rows: usize,
    defenses: Vec<TeamDefense>,
    defense_index: HashMap<String, usize>,
    league_average: DefenseMetrics,
    games: Vec<GameRecord>,
    loaded_at: DateTime<Utc>,
}

impl StatsStore {
    pub fn load(config: &DataConfig) -> Result<Self> {
        let players = File::open(&config.players_path)?;
        let teams = File::open(&config.teams_path)?;

        let games: Box<dyn Read> = if Path::new(&config.games_path).exists() {
            Box::new(File::open(&config.games_path)?)
        } else {
            tracing::warn!(
                "Games table {} not found, continuing without it",
                config.games_path.display()
            );
            Box::new(io::empty())
        };

        let store = Self::from_readers(players, teams, games)?;
        tracing::info!(
            "Loaded {} player rows ({} players), {} teams, {} games from {}",
            store.player_rows,
            store.player_names.len(),
            store.defenses.len(),
            store.games.len(),
            config.players_path.parent().unwrap_or(Path::new(".")).display()
        );
        Ok(store)
    }

    pub fn from_readers<P: Read, T: Read, G: Read>(players: P, teams: T, games: G) -> Result<Self> {
        let (player_records, stat_columns) = read_players(players)?;
        let defenses = read_team_defense(teams)?;
        let games = read_games(games)?;

        let player_rows = player_records.len();
        let player_names = player_records.iter().map(|r| r.player.clone()).collect();

        let mut players_by_team: HashMap<String, Vec<PlayerRecord>> = HashMap::new();
        for record in player_records {
            players_by_team.entry(record.team.clone()).or_default().push(record);
        }

        let defense_index = defenses
            .iter()
            .enumerate()
            .map(|(i, d)| (d.team.clone(), i))
            .collect();

        let league_average = DefenseMetrics {
            drtg: defenses.iter().map(|d| d.metrics.drtg).mean(),
            efg_pct: defenses.iter().map(|d| d.metrics.efg_pct).mean(),
        };

        Ok(Self {
            players_by_team,
            player_names,
            stat_columns,
            player_rows,
            defenses,
            defense_index,
            league_average,
            games,
            loaded_at: Utc::now(),
        })
    }

    /// Player rows filed under a team abbreviation.
    pub fn team_players(&self, abbreviation: &str) -> &[PlayerRecord] {
        self.players_by_team
            .get(abbreviation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if the name appears anywhere in the players table, on any team.
    pub fn has_player(&self, name: &str) -> bool {
        self.player_names.contains(name)
    }

    pub fn has_stat_column(&self, column: &str) -> bool {
        self.stat_columns.contains(column)
    }

    pub fn stat_columns(&self) -> impl Iterator<Item = &str> {
        self.stat_columns.iter().map(String::as_str)
    }

    /// Non-missing values of `stat` across every row for this player on this team.
    pub fn stat_samples(&self, abbreviation: &str, player: &str, stat: &str) -> Vec<f64> {
        self.team_players(abbreviation)
            .iter()
            .filter(|r| r.player == player)
            .filter_map(|r| r.stat(stat))
            .collect()
    }

    pub fn defense(&self, full_name: &str) -> Option<DefenseMetrics> {
        self.defense_index
            .get(full_name)
            .map(|&i| self.defenses[i].metrics)
    }

    pub fn league_average(&self) -> DefenseMetrics {
        self.league_average
    }

    pub fn player_row_count(&self) -> usize {
        self.player_rows
    }

    pub fn team_count(&self) -> usize {
        self.defenses.len()
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// Column names of the games table, sorted. Empty when no games were loaded.
    pub fn game_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .games
            .first()
            .map(|g| g.fields.keys().cloned().collect())
            .unwrap_or_default();
        columns.sort();
        columns
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

fn column_index(headers: &StringRecord, table: &'static str, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| StatsError::MissingColumn {
            table,
            column: column.to_string(),
        })
}

/// Cell spellings read as a missing value, matching pandas' default NA set.
const MISSING_TOKENS: [&str; 17] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "n/a", "nan",
];

/// `None` for a missing cell, otherwise the parse result. Non-finite numbers count as missing.
fn parse_cell(cell: &str) -> Option<std::result::Result<f64, std::num::ParseFloatError>> {
    let trimmed = cell.trim();
    if MISSING_TOKENS.contains(&trimmed) || trimmed.eq_ignore_ascii_case("null") {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_finite() => None,
        parsed => Some(parsed),
    }
}

fn read_players<R: Read>(source: R) -> Result<(Vec<PlayerRecord>, BTreeSet<String>)> {
    let mut reader = ReaderBuilder::new().from_reader(source);
    let headers = reader.headers()?.clone();
    let team_idx = column_index(&headers, "players", TEAM_COLUMN)?;
    let player_idx = column_index(&headers, "players", PLAYER_COLUMN)?;

    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    // A stat column is any other column whose non-empty cells are all numeric
    let stat_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != team_idx && *i != player_idx)
        .filter(|(i, _)| {
            rows.iter()
                .all(|row| !matches!(row.get(*i).and_then(parse_cell), Some(Err(_))))
        })
        .map(|(i, name)| (i, name.to_string()))
        .collect();

    let records = rows
        .iter()
        .map(|row| {
            let stats = stat_columns
                .iter()
                .filter_map(|(i, name)| match row.get(*i).and_then(parse_cell) {
                    Some(Ok(value)) => Some((name.clone(), value)),
                    _ => None,
                })
                .collect();

            PlayerRecord {
                team: row.get(team_idx).unwrap_or_default().to_string(),
                player: row.get(player_idx).unwrap_or_default().to_string(),
                stats,
            }
        })
        .collect();

    let columns = stat_columns.into_iter().map(|(_, name)| name).collect();
    Ok((records, columns))
}

fn read_team_defense<R: Read>(source: R) -> Result<Vec<TeamDefense>> {
    let mut reader = ReaderBuilder::new().from_reader(source);
    let headers = reader.headers()?.clone();
    let team_idx = column_index(&headers, "teams", TEAM_COLUMN)?;
    let drtg_idx = column_index(&headers, "teams", DRTG_COLUMN)?;
    let efg_idx = column_index(&headers, "teams", EFG_COLUMN)?;

    let mut defenses = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let number = |idx: usize, column: &str| -> Result<f64> {
            let raw = row.get(idx).unwrap_or_default();
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| StatsError::InvalidNumber {
                    table: "teams",
                    row: i + 1,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
        };

        defenses.push(TeamDefense {
            team: row.get(team_idx).unwrap_or_default().to_string(),
            metrics: DefenseMetrics {
                drtg: number(drtg_idx, DRTG_COLUMN)?,
                efg_pct: number(efg_idx, EFG_COLUMN)?,
            },
        });
    }

    Ok(defenses)
}

fn read_games<R: Read>(source: R) -> Result<Vec<GameRecord>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();

    reader
        .records()
        .map(|row| {
            let row = row?;
            let fields = headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();
            Ok(GameRecord { fields })
        })
        .collect()
}
