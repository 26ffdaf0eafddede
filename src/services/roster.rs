use std::collections::BTreeSet;

use crate::db::{abbreviation_for, full_names, StatsStore};

/// All 30 canonical team names, in table order.
pub fn list_teams() -> Vec<&'static str> {
    full_names()
}

/// Distinct player names for a team, sorted ascending. Unknown or absent teams yield an empty roster.
pub fn list_players(store: &StatsStore, team: Option<&str>) -> Vec<String> {
    let Some(abbreviation) = team.and_then(abbreviation_for) else {
        return Vec::new();
    };

    store
        .team_players(abbreviation)
        .iter()
        .map(|r| r.player.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::store;

    #[test]
    fn test_list_teams_is_stable() {
        let first = list_teams();
        assert_eq!(first.len(), 30);
        assert_eq!(first, list_teams());
    }

    #[test]
    fn test_list_players_sorted_and_distinct() {
        let store = store();
        let roster = list_players(&store, Some("Boston Celtics"));
        assert_eq!(roster, vec!["Derrick White", "Jaylen Brown", "Jayson Tatum"]);
    }

    #[test]
    fn test_list_players_soft_failures() {
        let store = store();
        assert!(list_players(&store, Some("Nonexistent Team")).is_empty());
        assert!(list_players(&store, None).is_empty());
        // Valid team with no rows in the table
        assert!(list_players(&store, Some("Utah Jazz")).is_empty());
    }
}
