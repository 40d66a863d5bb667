//! Future draft pick seeding and traded-pick reconciliation

use crate::{
    sleeper::types::RawDraftPick,
    storage::{DraftPick, Roster},
    LeagueId, RosterId, Season,
};
use std::collections::HashMap;
use tracing::debug;

/// Number of future seasons tracked for pick ownership.
pub const SEEDED_SEASONS: u16 = 3;

/// One pick per roster per round for each of the next three seasons, owned
/// by the roster it was issued to.
pub fn seed_draft_picks(
    rosters: &[Roster],
    league_id: &LeagueId,
    base_season: Season,
    draft_rounds: u16,
) -> Vec<DraftPick> {
    let mut picks =
        Vec::with_capacity(rosters.len() * usize::from(draft_rounds) * usize::from(SEEDED_SEASONS));

    for offset in 1..=SEEDED_SEASONS {
        let season = base_season.plus(offset);
        for roster in rosters {
            for round in 1..=draft_rounds {
                picks.push(DraftPick {
                    league_id: league_id.clone(),
                    season,
                    round,
                    original_roster_id: roster.roster_id,
                    current_roster_id: roster.roster_id,
                    pick_id: None,
                    source: "seed".to_string(),
                });
            }
        }
    }

    picks
}

/// Reassign current ownership from the traded-picks feed.
///
/// The feed describes present ownership rather than a history, so each
/// record simply overwrites `current_roster_id`; applying the same feed to a
/// fresh seed always yields the same table. Records naming a pick outside
/// the seeded horizon, or missing a field, are skipped. Returns the number
/// of records applied.
pub fn apply_traded_picks(picks: &mut [DraftPick], traded: &[RawDraftPick]) -> usize {
    let index: HashMap<(Season, u16, RosterId), usize> = picks
        .iter()
        .enumerate()
        .map(|(i, p)| ((p.season, p.round, p.original_roster_id), i))
        .collect();

    let mut applied = 0;
    for record in traded {
        let key = match (
            record.season.as_deref().and_then(|s| s.parse::<Season>().ok()),
            record.round,
            record.roster_id,
            record.owner_id,
        ) {
            (Some(season), Some(round), Some(original), Some(_)) => {
                (season, round, RosterId::new(original))
            }
            _ => {
                debug!(?record, "Skipping incomplete traded pick");
                continue;
            }
        };

        let Some(&i) = index.get(&key) else {
            debug!(
                season = %key.0,
                round = key.1,
                roster_id = %key.2,
                "Traded pick outside seeded seasons"
            );
            continue;
        };

        if let Some(owner) = record.owner_id {
            picks[i].current_roster_id = RosterId::new(owner);
            picks[i].source = "traded".to_string();
            applied += 1;
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::types::parse_list;
    use serde_json::json;

    fn rosters(n: u32) -> Vec<Roster> {
        (1..=n)
            .map(|id| Roster {
                league_id: LeagueId::new("L1"),
                roster_id: RosterId::new(id),
                owner_user_id: None,
                settings_json: None,
                metadata_json: None,
                record_string: None,
            })
            .collect()
    }

    #[test]
    fn test_seed_covers_every_roster_season_round() {
        let picks = seed_draft_picks(&rosters(4), &LeagueId::new("L1"), Season::new(2024), 3);
        assert_eq!(picks.len(), 4 * 3 * 3);

        for season in [2025, 2026, 2027] {
            for roster in 1..=4 {
                for round in 1..=3 {
                    let matching: Vec<_> = picks
                        .iter()
                        .filter(|p| {
                            p.season == Season::new(season)
                                && p.round == round
                                && p.original_roster_id == RosterId::new(roster)
                        })
                        .collect();
                    assert_eq!(matching.len(), 1);
                    assert_eq!(matching[0].current_roster_id, RosterId::new(roster));
                    assert_eq!(matching[0].source, "seed");
                }
            }
        }
    }

    #[test]
    fn test_seed_without_rounds_is_empty() {
        assert!(
            seed_draft_picks(&rosters(4), &LeagueId::new("L1"), Season::new(2024), 0).is_empty()
        );
    }

    #[test]
    fn test_apply_traded_picks() {
        let mut picks = seed_draft_picks(&rosters(4), &LeagueId::new("L1"), Season::new(2024), 2);
        let traded: Vec<RawDraftPick> = parse_list(
            "traded_pick",
            &json!([
                { "season": "2025", "round": 1, "roster_id": 1, "owner_id": 3 },
                { "season": "2026", "round": 2, "roster_id": 4, "owner_id": 2 },
                { "season": "2031", "round": 1, "roster_id": 1, "owner_id": 2 },
                { "season": "2025", "round": 1, "roster_id": 2 }
            ]),
        )
        .unwrap();

        let applied = apply_traded_picks(&mut picks, &traded);
        assert_eq!(applied, 2);

        let moved: Vec<&DraftPick> = picks
            .iter()
            .filter(|p| p.current_roster_id != p.original_roster_id)
            .collect();
        assert_eq!(moved.len(), 2);
        assert!(moved.iter().all(|p| p.source == "traded"));

        let first = moved
            .iter()
            .find(|p| p.season == Season::new(2025))
            .unwrap();
        assert_eq!(first.original_roster_id, RosterId::new(1));
        assert_eq!(first.current_roster_id, RosterId::new(3));
    }

    #[test]
    fn test_reapplying_feed_converges() {
        let traded: Vec<RawDraftPick> = parse_list(
            "traded_pick",
            &json!([{ "season": 2025, "round": 1, "roster_id": 1, "owner_id": 3 }]),
        )
        .unwrap();

        let mut once = seed_draft_picks(&rosters(3), &LeagueId::new("L1"), Season::new(2024), 1);
        apply_traded_picks(&mut once, &traded);

        let mut twice = once.clone();
        apply_traded_picks(&mut twice, &traded);
        assert_eq!(once, twice);
    }
}
