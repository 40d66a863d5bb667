//! Playoff bracket normalization

use crate::{
    sleeper::types::{RawBracketMatchup, RawBracketRef},
    storage::{BracketType, PlayoffMatchup},
    LeagueId, RosterId, Season,
};
use tracing::debug;

fn from_ref(slot: Option<&RawBracketRef>) -> (Option<u32>, Option<String>) {
    match slot.and_then(RawBracketRef::outcome) {
        Some((matchup_id, outcome)) => (Some(matchup_id), Some(outcome.to_string())),
        None => (None, None),
    }
}

/// Normalize one bracket. Nodes without a round or matchup id are skipped.
pub fn normalize_bracket(
    raw: &[RawBracketMatchup],
    league_id: &LeagueId,
    season: Season,
    bracket_type: BracketType,
) -> Vec<PlayoffMatchup> {
    raw.iter()
        .filter_map(|node| {
            let (Some(round), Some(matchup_id)) = (node.r, node.m) else {
                debug!(
                    bracket = %bracket_type,
                    ?node,
                    "Skipping bracket node without round or matchup"
                );
                return None;
            };
            let (t1_from_matchup_id, t1_from_outcome) = from_ref(node.t1_from.as_ref());
            let (t2_from_matchup_id, t2_from_outcome) = from_ref(node.t2_from.as_ref());

            Some(PlayoffMatchup {
                league_id: league_id.clone(),
                season,
                bracket_type,
                round,
                matchup_id,
                t1_roster_id: node.t1.map(RosterId::new),
                t2_roster_id: node.t2.map(RosterId::new),
                t1_from_matchup_id,
                t1_from_outcome,
                t2_from_matchup_id,
                t2_from_outcome,
                winner_roster_id: node.w.map(RosterId::new),
                loser_roster_id: node.l.map(RosterId::new),
                placement: node.p,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::types::parse_list;
    use serde_json::json;

    #[test]
    fn test_normalize_bracket() {
        let raw: Vec<RawBracketMatchup> = parse_list(
            "bracket",
            &json!([
                { "r": 1, "m": 1, "t1": 3, "t2": 6, "w": 3, "l": 6 },
                { "r": 1, "m": 2, "t1": 4, "t2": 5, "w": null, "l": null },
                { "r": 2, "m": 3, "t1": 1, "t2_from": { "w": 1 }, "t2": null },
                { "r": 3, "m": 5, "t1_from": { "w": 3 }, "t2_from": { "w": 4 }, "p": 1 },
                { "r": 3, "m": 6, "t1_from": { "l": 3 }, "t2_from": { "l": 4 }, "p": 3 },
                { "m": 9 }
            ]),
        )
        .unwrap();

        let rows = normalize_bracket(
            &raw,
            &LeagueId::new("L1"),
            Season::new(2024),
            BracketType::Winners,
        );
        assert_eq!(rows.len(), 5);

        assert_eq!(rows[0].winner_roster_id, Some(RosterId::new(3)));
        assert_eq!(rows[0].loser_roster_id, Some(RosterId::new(6)));
        assert_eq!(rows[1].winner_roster_id, None);

        assert_eq!(rows[2].t1_roster_id, Some(RosterId::new(1)));
        assert_eq!(rows[2].t2_roster_id, None);
        assert_eq!(rows[2].t2_from_matchup_id, Some(1));
        assert_eq!(rows[2].t2_from_outcome.as_deref(), Some("w"));

        assert_eq!(rows[3].placement, Some(1));
        assert_eq!(rows[4].t1_from_outcome.as_deref(), Some("l"));
        assert!(rows.iter().all(|r| r.bracket_type == BracketType::Winners));
    }
}
