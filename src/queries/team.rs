//! Team-centred queries: dossier, schedule and roster views

use super::{
    helpers::{format_record, round2, week_game_row, WEEK_GAME_SQL},
    league::with_week,
    output::{LineupBreakdown, PickOwnership, PlayerLine, ScheduleEntry, WeekGame},
};
use crate::{error::Result, storage::LeagueDatabase, RosterId, Week};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Number of games shown in a dossier.
const RECENT_GAMES: usize = 5;

type TeamGame = (WeekGame, RosterId, RosterId, Option<RosterId>);

impl LeagueDatabase {
    /// Every game `roster` played, oldest first.
    fn team_games(&self, roster: RosterId) -> Result<Vec<TeamGame>> {
        let sql = format!(
            "{} WHERE g.roster_id_a = ?1 OR g.roster_id_b = ?1 ORDER BY g.week, g.matchup_id",
            WEEK_GAME_SQL
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![roster.as_u32()], |row| {
                let (game, a, b) = week_game_row(row)?;
                let winner = row.get::<_, Option<u32>>(9)?.map(RosterId::new);
                Ok((game, a, b, winner))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Team identity, standing as of `week`, and its most recent games.
    pub fn get_team_dossier(&self, roster_key: &str, week: Week) -> Result<Value> {
        let resolved = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(with_week(miss, week)),
        };
        let roster_id = resolved.roster_id;

        let standings = self
            .conn
            .query_row(
                "SELECT wins, losses, ties, points_for, points_against, rank,
                        streak_type, streak_len
                 FROM standings WHERE roster_id = ?1 AND week = ?2",
                params![roster_id.as_u32(), week.as_u16()],
                |row| {
                    let (wins, losses, ties) = (row.get(0)?, row.get(1)?, row.get(2)?);
                    Ok(json!({
                        "wins": wins,
                        "losses": losses,
                        "ties": ties,
                        "record": format_record(wins, losses, ties),
                        "points_for": round2(row.get(3)?),
                        "points_against": round2(row.get(4)?),
                        "rank": row.get::<_, Option<u32>>(5)?,
                        "streak_type": row.get::<_, Option<String>>(6)?,
                        "streak_len": row.get::<_, Option<u32>>(7)?,
                    }))
                },
            )
            .optional()?;

        let mut recent_games: Vec<_> = self
            .team_games(roster_id)?
            .into_iter()
            .filter(|(game, ..)| game.week <= week.as_u16())
            .map(|(game, ..)| game)
            .collect();
        recent_games.reverse();
        recent_games.truncate(RECENT_GAMES);

        Ok(json!({
            "found": true,
            "as_of_week": week,
            "team": self.team_summary(roster_id)?,
            "standings": standings,
            "recent_games": recent_games,
        }))
    }

    /// Every game of the season from one team's side, split at the playoffs.
    ///
    /// Regular-season entries carry the cumulative record after that week.
    pub fn get_team_schedule(&self, roster_key: &str, current_week: Week) -> Result<Value> {
        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(miss),
        };
        let roster_id = team.roster_id;
        let playoff_week_start = self.playoff_week_start()?;

        let mut stmt = self.conn.prepare(
            "SELECT week, wins, losses, ties FROM standings WHERE roster_id = ?1",
        )?;
        let records: HashMap<u16, String> = stmt
            .query_map(params![roster_id.as_u32()], |row| {
                Ok((
                    row.get::<_, u16>(0)?,
                    format_record(row.get(1)?, row.get(2)?, row.get(3)?),
                ))
            })?
            .collect::<rusqlite::Result<_>>()?;

        let mut regular_season_games = Vec::new();
        let mut playoff_games = Vec::new();
        for (game, a, _, winner) in self.team_games(roster_id)? {
            let is_a = a == roster_id;
            let (team_points, opponent_points, opponent_name) = if is_a {
                (game.points_a, game.points_b, game.team_b)
            } else {
                (game.points_b, game.points_a, game.team_a)
            };
            let result = match winner {
                Some(w) if w == roster_id => "W",
                Some(_) => "L",
                None => "T",
            };
            let is_playoffs = playoff_week_start.is_some_and(|start| game.week >= start);

            let entry = ScheduleEntry {
                week: game.week,
                opponent_name,
                team_points,
                opponent_points,
                result: result.to_string(),
                record_after_week: if is_playoffs {
                    None
                } else {
                    records.get(&game.week).cloned()
                },
            };
            if is_playoffs {
                playoff_games.push(entry);
            } else {
                regular_season_games.push(entry);
            }
        }

        Ok(json!({
            "found": true,
            "as_of_week": current_week,
            "team_name": team.team_name,
            "regular_season_games": regular_season_games,
            "playoff_games": playoff_games,
        }))
    }

    /// Current roster grouped by role and position, plus owned draft picks.
    pub fn get_roster_current(&self, roster_key: &str) -> Result<Value> {
        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(miss),
        };
        let roster_id = team.roster_id;

        let mut stmt = self.conn.prepare(
            "SELECT p.full_name, p.position, p.nfl_team, p.status, p.injury_status, rp.role
             FROM roster_players rp
             LEFT JOIN players p ON p.player_id = rp.player_id
             WHERE rp.roster_id = ?1",
        )?;
        let players = stmt
            .query_map(params![roster_id.as_u32()], |row| {
                Ok(PlayerLine {
                    player_name: row.get(0)?,
                    position: row.get(1)?,
                    nfl_team: row.get(2)?,
                    status: row.get(3)?,
                    injury_status: row.get(4)?,
                    points: None,
                    role: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT dp.season, dp.round, tpo.team_name, tpc.team_name
             FROM draft_picks dp
             LEFT JOIN team_profiles tpo
                ON tpo.league_id = dp.league_id AND tpo.roster_id = dp.original_roster_id
             LEFT JOIN team_profiles tpc
                ON tpc.league_id = dp.league_id AND tpc.roster_id = dp.current_roster_id
             WHERE dp.current_roster_id = ?1
             ORDER BY dp.season, dp.round, dp.original_roster_id",
        )?;
        let picks = stmt
            .query_map(params![roster_id.as_u32()], |row| {
                Ok(PickOwnership {
                    season: row.get(0)?,
                    round: row.get(1)?,
                    original_team_name: row.get(2)?,
                    current_team_name: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(json!({
            "found": true,
            "team": self.team_summary(roster_id)?,
            "roster": LineupBreakdown::organize(players),
            "picks": picks,
        }))
    }

    /// The roster as it stood in `week`, with each player's points.
    pub fn get_roster_snapshot(&self, roster_key: &str, week: Week) -> Result<Value> {
        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(miss),
        };
        let roster_id = team.roster_id;

        let mut stmt = self.conn.prepare(
            "SELECT p.full_name, p.position, p.nfl_team, pp.points, pp.role
             FROM player_performances pp
             LEFT JOIN players p ON p.player_id = pp.player_id
             WHERE pp.roster_id = ?1 AND pp.week = ?2",
        )?;
        let players = stmt
            .query_map(params![roster_id.as_u32(), week.as_u16()], |row| {
                Ok(PlayerLine {
                    player_name: row.get(0)?,
                    position: row.get(1)?,
                    nfl_team: row.get(2)?,
                    status: None,
                    injury_status: None,
                    points: Some(round2(row.get(3)?)),
                    role: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if players.is_empty() {
            return Ok(json!({ "found": false, "roster_key": roster_key, "week": week }));
        }

        Ok(json!({
            "found": true,
            "as_of_week": week,
            "team": self.team_summary(roster_id)?,
            "roster": LineupBreakdown::organize(players),
        }))
    }
}
