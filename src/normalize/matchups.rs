//! Weekly matchup rows, player performances and game pairing

use crate::{
    sleeper::types::RawMatchup,
    storage::{Game, MatchupRow, PlayerPerformance, RosterRole},
    LeagueId, PlayerId, RosterId, Season, Week,
};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Split one week's matchup payload into matchup rows and per-player rows.
///
/// Rows without a `matchup_id` (teams with no game that week) are dropped.
/// A player counts as a starter when listed in that row's `starters`;
/// missing points default to 0.0.
pub fn normalize_matchups(
    raw: &[RawMatchup],
    league_id: &LeagueId,
    season: Season,
    week: Week,
) -> (Vec<MatchupRow>, Vec<PlayerPerformance>) {
    let mut rows = Vec::with_capacity(raw.len());
    let mut performances = Vec::new();

    for entry in raw {
        let Some(matchup_id) = entry.matchup_id else {
            debug!(week = %week, roster_id = entry.roster_id, "Matchup row without matchup_id");
            continue;
        };
        let roster_id = RosterId::new(entry.roster_id);

        let starters: HashSet<&str> = entry.starters.iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::new();
        for player_id in entry.players.iter().filter(|p| seen.insert(p.as_str())) {
            performances.push(PlayerPerformance {
                league_id: league_id.clone(),
                season,
                week,
                player_id: PlayerId::new(player_id.as_str()),
                roster_id,
                matchup_id,
                points: entry.players_points.get(player_id).copied().unwrap_or(0.0),
                role: if starters.contains(player_id.as_str()) {
                    RosterRole::Starter
                } else {
                    RosterRole::Bench
                },
            });
        }

        rows.push(MatchupRow {
            league_id: league_id.clone(),
            season,
            week,
            matchup_id,
            roster_id,
            points: entry.points,
            starters: entry.starters.iter().map(PlayerId::new).collect(),
            players: entry.players.iter().map(PlayerId::new).collect(),
            players_points: entry
                .players_points
                .iter()
                .map(|(k, v)| (PlayerId::new(k.as_str()), *v))
                .collect(),
        });
    }

    (rows, performances)
}

/// Pair matchup rows sharing `(week, matchup_id)` into games.
///
/// Within a pair, side `a` is the lower roster id. The winner is the higher
/// score, or `None` on equal points. Unpaired rows (byes) are skipped; groups
/// of more than two rows are malformed and skipped with a warning.
pub fn derive_games(rows: &[MatchupRow], playoff_week_start: Option<Week>) -> Vec<Game> {
    let mut grouped: BTreeMap<(Week, u32), Vec<&MatchupRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry((row.week, row.matchup_id)).or_default().push(row);
    }

    let mut games = Vec::with_capacity(grouped.len());
    for ((week, matchup_id), mut group) in grouped {
        match group.len() {
            2 => {}
            1 => {
                debug!(week = %week, matchup_id, "Skipping unpaired matchup row");
                continue;
            }
            n => {
                warn!(week = %week, matchup_id, rows = n, "Skipping malformed matchup group");
                continue;
            }
        }

        group.sort_by_key(|r| r.roster_id);
        let (a, b) = (group[0], group[1]);
        let winner_roster_id = if a.points > b.points {
            Some(a.roster_id)
        } else if b.points > a.points {
            Some(b.roster_id)
        } else {
            None
        };

        games.push(Game {
            league_id: a.league_id.clone(),
            season: a.season,
            week,
            matchup_id,
            roster_id_a: a.roster_id,
            roster_id_b: b.roster_id,
            points_a: a.points,
            points_b: b.points,
            winner_roster_id,
            is_playoffs: playoff_week_start.is_some_and(|start| week >= start),
        });
    }

    games
}
