//! Playoff bracket queries

use super::output::{BracketMatchup, BracketView, Placement, PlayoffStep};
use crate::{error::Result, storage::models::BracketType, storage::LeagueDatabase, RosterId};
use rusqlite::{params, Row};
use serde_json::{json, Map, Value};

const BRACKET_SQL: &str = "SELECT pm.bracket_type, pm.round, pm.matchup_id,
        pm.t1_roster_id, t1.team_name, pm.t1_from_matchup_id, pm.t1_from_outcome,
        pm.t2_roster_id, t2.team_name, pm.t2_from_matchup_id, pm.t2_from_outcome,
        pm.winner_roster_id, w.team_name, pm.loser_roster_id, l.team_name,
        pm.placement
     FROM playoff_matchups pm
     LEFT JOIN team_profiles t1 ON t1.league_id = pm.league_id AND t1.roster_id = pm.t1_roster_id
     LEFT JOIN team_profiles t2 ON t2.league_id = pm.league_id AND t2.roster_id = pm.t2_roster_id
     LEFT JOIN team_profiles w ON w.league_id = pm.league_id AND w.roster_id = pm.winner_roster_id
     LEFT JOIN team_profiles l ON l.league_id = pm.league_id AND l.roster_id = pm.loser_roster_id";

/// A bracket row with every slot labelled for display.
struct BracketRow {
    bracket_type: String,
    t1: Option<RosterId>,
    t2: Option<RosterId>,
    winner: Option<RosterId>,
    loser: Option<RosterId>,
    matchup: BracketMatchup,
}

/// Team name, else "Roster N", else where the slot will be filled from.
fn slot_label(
    team_name: Option<String>,
    roster_id: Option<u32>,
    from_matchup: Option<u32>,
    from_outcome: Option<String>,
) -> Option<String> {
    if let Some(name) = team_name {
        return Some(name);
    }
    if let Some(id) = roster_id {
        return Some(format!("Roster {}", id));
    }
    from_matchup.map(|m| match from_outcome.as_deref() {
        Some("l") => format!("Loser of Match {}", m),
        _ => format!("Winner of Match {}", m),
    })
}

fn roster_label(team_name: Option<String>, roster_id: Option<u32>) -> Option<String> {
    slot_label(team_name, roster_id, None, None)
}

fn bracket_row(row: &Row<'_>) -> rusqlite::Result<BracketRow> {
    let t1: Option<u32> = row.get(3)?;
    let t2: Option<u32> = row.get(7)?;
    let winner: Option<u32> = row.get(11)?;
    let loser: Option<u32> = row.get(13)?;

    Ok(BracketRow {
        bracket_type: row.get(0)?,
        t1: t1.map(RosterId::new),
        t2: t2.map(RosterId::new),
        winner: winner.map(RosterId::new),
        loser: loser.map(RosterId::new),
        matchup: BracketMatchup {
            round: row.get(1)?,
            matchup_id: row.get(2)?,
            team_1: slot_label(row.get(4)?, t1, row.get(5)?, row.get(6)?),
            team_2: slot_label(row.get(8)?, t2, row.get(9)?, row.get(10)?),
            winner: roster_label(row.get(12)?, winner),
            loser: roster_label(row.get(14)?, loser),
            status: if winner.is_some() { "complete" } else { "pending" }.to_string(),
            placement: row.get(15)?,
        },
    })
}

impl BracketView {
    fn push(&mut self, matchup: BracketMatchup) {
        if let (Some(placement), Some(team_name)) = (matchup.placement, matchup.winner.clone()) {
            if placement == 1 {
                self.champion = Some(team_name.clone());
            }
            self.placements.push(Placement {
                placement,
                team_name,
            });
        }
        self.rounds.entry(matchup.round).or_default().push(matchup);
    }
}

impl LeagueDatabase {
    fn bracket_rows(&self, bracket_type: Option<BracketType>) -> Result<Vec<BracketRow>> {
        let sql = format!(
            "{} WHERE (?1 IS NULL OR pm.bracket_type = ?1)
             ORDER BY pm.bracket_type DESC, pm.round, pm.matchup_id",
            BRACKET_SQL
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![bracket_type.map(|b| b.as_str())], bracket_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// The winners and/or losers bracket grouped by round.
    ///
    /// Completed placement games name their winner under `placements`; the
    /// winner of the first-place game is the champion.
    pub fn get_playoff_bracket(&self, bracket_type: Option<BracketType>) -> Result<Value> {
        let rows = self.bracket_rows(bracket_type)?;
        if rows.is_empty() {
            return Ok(json!({ "found": false }));
        }

        let mut winners = BracketView::default();
        let mut losers = BracketView::default();
        for row in rows {
            if row.bracket_type == BracketType::Losers.as_str() {
                losers.push(row.matchup);
            } else {
                winners.push(row.matchup);
            }
        }
        for view in [&mut winners, &mut losers] {
            view.placements.sort_by_key(|p| p.placement);
        }

        let mut brackets = Map::new();
        if bracket_type != Some(BracketType::Losers) {
            brackets.insert(BracketType::Winners.to_string(), json!(winners));
        }
        if bracket_type != Some(BracketType::Winners) {
            brackets.insert(BracketType::Losers.to_string(), json!(losers));
        }
        Ok(json!({ "found": true, "brackets": brackets }))
    }

    /// One team's route through the playoffs, round by round.
    pub fn get_team_playoff_path(&self, roster_key: &str) -> Result<Value> {
        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(miss),
        };
        let me = Some(team.roster_id);

        let rows: Vec<_> = self
            .bracket_rows(None)?
            .into_iter()
            .filter(|r| r.t1 == me || r.t2 == me || r.winner == me || r.loser == me)
            .collect();
        if rows.is_empty() {
            return Ok(json!({ "found": false, "roster_key": roster_key }));
        }

        let bracket_type = rows[0].bracket_type.clone();
        let mut matchups = Vec::new();
        let mut is_eliminated = false;
        let mut final_placement = None;

        for row in rows {
            let opponent = if row.t1 == me {
                row.matchup.team_2
            } else {
                row.matchup.team_1
            };
            let result = if row.winner == me {
                if row.matchup.placement.is_some() {
                    final_placement = row.matchup.placement;
                }
                "win"
            } else if row.loser == me {
                is_eliminated = true;
                "loss"
            } else {
                "pending"
            };
            matchups.push(PlayoffStep {
                round: row.matchup.round,
                matchup_id: row.matchup.matchup_id,
                opponent,
                result: result.to_string(),
                placement: row.matchup.placement,
            });
        }

        Ok(json!({
            "found": true,
            "team_name": team.team_name,
            "bracket_type": bracket_type,
            "matchups": matchups,
            "is_eliminated": is_eliminated,
            "final_placement": final_placement,
            "is_champion": final_placement == Some(1),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchup(round: u16, winner: Option<&str>, placement: Option<u16>) -> BracketMatchup {
        BracketMatchup {
            matchup_id: round as u32,
            round,
            team_1: Some("A".to_string()),
            team_2: Some("B".to_string()),
            winner: winner.map(str::to_string),
            loser: None,
            status: "complete".to_string(),
            placement,
        }
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(
            slot_label(Some("Team Taco".into()), Some(1), None, None).as_deref(),
            Some("Team Taco")
        );
        assert_eq!(slot_label(None, Some(4), None, None).as_deref(), Some("Roster 4"));
        assert_eq!(
            slot_label(None, None, Some(2), Some("w".into())).as_deref(),
            Some("Winner of Match 2")
        );
        assert_eq!(
            slot_label(None, None, Some(3), Some("l".into())).as_deref(),
            Some("Loser of Match 3")
        );
        assert_eq!(slot_label(None, None, None, None), None);
    }

    #[test]
    fn test_view_records_placements_and_champion() {
        let mut view = BracketView::default();
        view.push(matchup(1, Some("A"), None));
        view.push(matchup(3, Some("B"), Some(3)));
        view.push(matchup(3, Some("A"), Some(1)));
        view.push(matchup(3, None, Some(5)));

        assert_eq!(view.champion.as_deref(), Some("A"));
        assert_eq!(view.placements.len(), 2);
        assert_eq!(view.rounds[&3].len(), 3);
        assert_eq!(view.rounds[&1].len(), 1);
    }
}
