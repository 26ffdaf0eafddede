use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the players table. `stats` only holds cells that parsed as numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub team: String, // 3-letter abbreviation
    pub player: String,
    pub stats: HashMap<String, f64>,
}

impl PlayerRecord {
    pub fn stat(&self, column: &str) -> Option<f64> {
        self.stats.get(column).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseMetrics {
    pub drtg: f64,
    pub efg_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamDefense {
    pub team: String, // full name
    pub metrics: DefenseMetrics,
}

/// Games rows are kept verbatim; only their column names are reported.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayersQuery {
    pub team: Option<String>,
}

impl PlayersQuery {
    /// Keeps the first `team` value when the key repeats; other keys are ignored.
    pub fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        Self {
            team: pairs
                .into_iter()
                .find(|(key, _)| key == "team")
                .map(|(_, value)| value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeBetRequest {
    pub team: String,
    pub player: String,
    pub stat: String,
    pub line: f64,
    pub opponent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetAnalysis {
    pub player: String,
    pub stat: String,
    pub player_avg: f64,
    pub assessment: String,
    pub impact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefenseImpact {
    Strong,
    Weak,
    Average,
}

impl DefenseImpact {
    pub fn message(self) -> &'static str {
        match self {
            DefenseImpact::Strong => "The opponent has a strong defense. Expect lower stats.",
            DefenseImpact::Weak => "The opponent has a weak defense. Expect better stats.",
            DefenseImpact::Average => "The opponent has an average defense.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAssessment {
    TooHigh,
    TooLow,
    Accurate,
}

impl LineAssessment {
    pub fn message(self) -> &'static str {
        match self {
            LineAssessment::TooHigh => "Line is too high.",
            LineAssessment::TooLow => "Line is too low.",
            LineAssessment::Accurate => "Line is accurate.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub players: usize,
    pub teams: usize,
    pub games: usize,
    pub game_columns: Vec<String>,
    pub stat_columns: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

// API Response types
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
