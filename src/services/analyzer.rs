use statrs::statistics::Statistics;

use crate::db::{abbreviation_for, StatsStore};
use crate::error::{Result, StatsError};
use crate::models::{AnalyzeBetRequest, BetAnalysis, DefenseImpact, DefenseMetrics, LineAssessment};

pub struct BetAnalyzer<'a> {
    store: &'a StatsStore,
}

impl<'a> BetAnalyzer<'a> {
    pub fn new(store: &'a StatsStore) -> Self {
        Self { store }
    }

    /// Compare a proposed line with the player's season average and grade the opponent's defense.
    pub fn analyze(&self, request: &AnalyzeBetRequest) -> Result<BetAnalysis> {
        let team_abbr = abbreviation_for(&request.team)
            .filter(|_| self.store.has_player(&request.player))
            .ok_or(StatsError::InvalidInput)?;

        if !self.store.has_stat_column(&request.stat) {
            return Err(StatsError::UnknownStat {
                stat: request.stat.clone(),
            });
        }

        let opponent = self
            .store
            .defense(&request.opponent)
            .ok_or(StatsError::UnknownOpponent)?;

        let samples = self
            .store
            .stat_samples(team_abbr, &request.player, &request.stat);
        let player_avg = round2(samples.iter().mean());
        // Mean of no samples is NaN
        if !player_avg.is_finite() {
            return Err(StatsError::NoData {
                player: request.player.clone(),
                stat: request.stat.clone(),
            });
        }

        let assessment = Self::assess_line(request.line, player_avg);
        let impact = Self::classify_defense(opponent, self.store.league_average());

        tracing::info!(
            "Analyzed {} {} line {} vs {}: avg {:.2}, {:?}, {:?}",
            request.player,
            request.stat,
            request.line,
            request.opponent,
            player_avg,
            assessment,
            impact
        );

        Ok(BetAnalysis {
            player: request.player.clone(),
            stat: request.stat.clone(),
            player_avg,
            assessment: assessment.message().to_string(),
            impact: impact.message().to_string(),
        })
    }

    /// Lower DRtg and eFG% than the league mean on both counts reads as a strong defense.
    pub fn classify_defense(opponent: DefenseMetrics, league: DefenseMetrics) -> DefenseImpact {
        if opponent.drtg < league.drtg && opponent.efg_pct < league.efg_pct {
            DefenseImpact::Strong
        } else if opponent.drtg > league.drtg && opponent.efg_pct > league.efg_pct {
            DefenseImpact::Weak
        } else {
            DefenseImpact::Average
        }
    }

    pub fn assess_line(line: f64, player_avg: f64) -> LineAssessment {
        if line > player_avg {
            LineAssessment::TooHigh
        } else if line < player_avg {
            LineAssessment::TooLow
        } else {
            LineAssessment::Accurate
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::store;

    fn request(player: &str, stat: &str, line: f64, opponent: &str) -> AnalyzeBetRequest {
        AnalyzeBetRequest {
            team: "Boston Celtics".to_string(),
            player: player.to_string(),
            stat: stat.to_string(),
            line,
            opponent: opponent.to_string(),
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(27.5), 27.5);
        assert_eq!(round2(4.666666), 4.67);
        assert_eq!(round2(6.333333), 6.33);
    }

    #[test]
    fn test_assess_line() {
        assert_eq!(BetAnalyzer::assess_line(30.5, 27.5), LineAssessment::TooHigh);
        assert_eq!(BetAnalyzer::assess_line(20.5, 27.5), LineAssessment::TooLow);
        assert_eq!(BetAnalyzer::assess_line(27.5, 27.5), LineAssessment::Accurate);
    }

    #[test]
    fn test_classify_defense() {
        let league = DefenseMetrics { drtg: 112.0, efg_pct: 0.54 };
        let strong = DefenseMetrics { drtg: 106.0, efg_pct: 0.51 };
        let weak = DefenseMetrics { drtg: 118.0, efg_pct: 0.57 };
        let mixed = DefenseMetrics { drtg: 106.0, efg_pct: 0.57 };
        let level = DefenseMetrics { drtg: 112.0, efg_pct: 0.50 };

        assert_eq!(BetAnalyzer::classify_defense(strong, league), DefenseImpact::Strong);
        assert_eq!(BetAnalyzer::classify_defense(weak, league), DefenseImpact::Weak);
        assert_eq!(BetAnalyzer::classify_defense(mixed, league), DefenseImpact::Average);
        assert_eq!(BetAnalyzer::classify_defense(level, league), DefenseImpact::Average);
    }

    #[test]
    fn test_analyze_strong_defense_and_high_line() {
        let store = store();
        let analysis = BetAnalyzer::new(&store)
            .analyze(&request("Jayson Tatum", "PTS", 29.5, "Oklahoma City Thunder"))
            .unwrap();

        assert_eq!(analysis.player, "Jayson Tatum");
        assert_eq!(analysis.stat, "PTS");
        assert_eq!(analysis.player_avg, 27.5);
        assert_eq!(analysis.assessment, "Line is too high.");
        assert_eq!(
            analysis.impact,
            "The opponent has a strong defense. Expect lower stats."
        );
    }

    #[test]
    fn test_analyze_weak_and_average_defense() {
        let store = store();
        let analyzer = BetAnalyzer::new(&store);

        let weak = analyzer
            .analyze(&request("Jaylen Brown", "PTS", 20.5, "Washington Wizards"))
            .unwrap();
        assert_eq!(weak.player_avg, 23.0);
        assert_eq!(weak.assessment, "Line is too low.");
        assert_eq!(weak.impact, "The opponent has a weak defense. Expect better stats.");

        // Miami: DRtg below league mean, eFG% above
        let mixed = analyzer
            .analyze(&request("Jaylen Brown", "PTS", 23.0, "Miami Heat"))
            .unwrap();
        assert_eq!(mixed.assessment, "Line is accurate.");
        assert_eq!(mixed.impact, "The opponent has an average defense.");
    }

    #[test]
    fn test_line_equal_to_reported_average_is_accurate() {
        let store = store();
        // Tatum assists average to exactly 4.5
        let analysis = BetAnalyzer::new(&store)
            .analyze(&request("Jayson Tatum", "AST", 4.5, "Boston Celtics"))
            .unwrap();
        assert_eq!(analysis.player_avg, 4.5);
        assert_eq!(analysis.assessment, "Line is accurate.");
    }

    #[test]
    fn test_analyze_rejects_unknown_team_or_player() {
        let store = store();
        let analyzer = BetAnalyzer::new(&store);

        let err = analyzer
            .analyze(&request("Nobody Atall", "PTS", 10.0, "Miami Heat"))
            .unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput));

        let mut bad_team = request("Jayson Tatum", "PTS", 10.0, "Miami Heat");
        bad_team.team = "Boston Celtic".to_string();
        assert!(matches!(
            analyzer.analyze(&bad_team).unwrap_err(),
            StatsError::InvalidInput
        ));
    }

    #[test]
    fn test_analyze_rejects_unknown_stat_and_opponent() {
        let store = store();
        let analyzer = BetAnalyzer::new(&store);

        let err = analyzer
            .analyze(&request("Jayson Tatum", "Pos", 10.0, "Miami Heat"))
            .unwrap_err();
        assert!(matches!(err, StatsError::UnknownStat { stat } if stat == "Pos"));

        let err = analyzer
            .analyze(&request("Jayson Tatum", "PTS", 10.0, "Seattle SuperSonics"))
            .unwrap_err();
        assert!(matches!(err, StatsError::UnknownOpponent));
    }

    #[test]
    fn test_analyze_player_known_elsewhere_has_no_data() {
        let store = store();
        // LeBron exists in the table, but not under BOS
        let err = BetAnalyzer::new(&store)
            .analyze(&request("LeBron James", "PTS", 25.5, "Miami Heat"))
            .unwrap_err();
        assert!(matches!(err, StatsError::NoData { .. }));
    }

    #[test]
    fn test_analyze_ignores_missing_value_tokens() {
        let store = StatsStore::from_readers(
            "Player,Team,PTS,AST\nA,BOS,NaN,N/A\nA,BOS,20,5\n".as_bytes(),
            crate::db::fixtures::TEAMS_CSV.as_bytes(),
            std::io::empty(),
        )
        .unwrap();
        let analyzer = BetAnalyzer::new(&store);

        let points = analyzer.analyze(&request("A", "PTS", 20.0, "Miami Heat")).unwrap();
        assert_eq!(points.player_avg, 20.0);
        assert_eq!(points.assessment, "Line is accurate.");

        let assists = analyzer.analyze(&request("A", "AST", 4.5, "Miami Heat")).unwrap();
        assert_eq!(assists.player_avg, 5.0);
        assert_eq!(assists.assessment, "Line is too low.");

        let json = serde_json::to_string(&points).unwrap();
        assert!(json.contains("\"player_avg\":20.0"));
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let store = store();
        let analyzer = BetAnalyzer::new(&store);
        let req = request("Derrick White", "AST", 4.5, "Los Angeles Lakers");
        let first = serde_json::to_string(&analyzer.analyze(&req).unwrap()).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(&req).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
