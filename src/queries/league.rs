//! League-wide queries: snapshot, standings, weekly games, leaderboards

use super::{
    helpers::{format_record, round2, week_game_row, WEEK_GAME_SQL},
    output::{
        BenchTotals, GameWithPlayers, LeaderboardEntry, LineupBreakdown, PlayerLine,
        StandingEntry, WeekGame,
    },
};
use crate::{error::Result, storage::LeagueDatabase, RosterId, Week};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};
use std::collections::HashMap;

type GameRow = (WeekGame, RosterId, RosterId);

impl LeagueDatabase {
    fn game_rows(&self, week: Week, roster: Option<RosterId>) -> Result<Vec<GameRow>> {
        let sql = format!(
            "{} WHERE g.week = ?1 AND (?2 IS NULL OR g.roster_id_a = ?2 OR g.roster_id_b = ?2)
             ORDER BY g.matchup_id",
            WEEK_GAME_SQL
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![week.as_u16(), roster.map(|r| r.as_u32())],
                week_game_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Every player performance in `week`, grouped per (matchup, roster).
    fn week_lineups(&self, week: Week) -> Result<HashMap<(u32, RosterId), LineupBreakdown>> {
        let mut stmt = self.conn.prepare(
            "SELECT pp.matchup_id, pp.roster_id, p.full_name, p.position, p.nfl_team,
                    pp.points, pp.role
             FROM player_performances pp
             LEFT JOIN players p ON p.player_id = pp.player_id
             WHERE pp.week = ?1",
        )?;
        let rows = stmt.query_map(params![week.as_u16()], |row| {
            Ok((
                (row.get::<_, u32>(0)?, RosterId::new(row.get(1)?)),
                PlayerLine {
                    player_name: row.get(2)?,
                    position: row.get(3)?,
                    nfl_team: row.get(4)?,
                    status: None,
                    injury_status: None,
                    points: Some(round2(row.get(5)?)),
                    role: row.get(6)?,
                },
            ))
        })?;

        let mut grouped: HashMap<(u32, RosterId), Vec<PlayerLine>> = HashMap::new();
        for row in rows {
            let (key, line) = row?;
            grouped.entry(key).or_default().push(line);
        }
        Ok(grouped
            .into_iter()
            .map(|(key, players)| (key, LineupBreakdown::organize(players)))
            .collect())
    }

    fn attach_players(&self, week: Week, rows: Vec<GameRow>) -> Result<Vec<GameWithPlayers>> {
        let mut lineups = self.week_lineups(week)?;
        Ok(rows
            .into_iter()
            .map(|(game, a, b)| {
                let team_a_players = lineups.remove(&(game.matchup_id, a)).unwrap_or_default();
                let team_b_players = lineups.remove(&(game.matchup_id, b)).unwrap_or_default();
                GameWithPlayers {
                    game,
                    team_a_players,
                    team_b_players,
                }
            })
            .collect())
    }

    /// All head-to-head games in `week`, ordered by matchup id.
    pub fn get_week_games(&self, week: Week) -> Result<Vec<WeekGame>> {
        Ok(self
            .game_rows(week, None)?
            .into_iter()
            .map(|(game, _, _)| game)
            .collect())
    }

    /// Week games with each side's lineup grouped by role and position.
    pub fn get_week_games_with_players(&self, week: Week) -> Result<Vec<GameWithPlayers>> {
        let rows = self.game_rows(week, None)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.attach_players(week, rows)
    }

    pub fn get_team_game(&self, roster_key: &str, week: Week) -> Result<Value> {
        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(with_week(miss, week)),
        };

        match self.game_rows(week, Some(team.roster_id))?.into_iter().next() {
            Some((game, _, _)) => Ok(json!({ "found": true, "as_of_week": week, "game": game })),
            None => Ok(json!({ "found": false, "roster_key": roster_key, "as_of_week": week })),
        }
    }

    pub fn get_team_game_with_players(&self, roster_key: &str, week: Week) -> Result<Value> {
        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(with_week(miss, week)),
        };

        let rows = self.game_rows(week, Some(team.roster_id))?;
        match self.attach_players(week, rows)?.into_iter().next() {
            Some(game) => Ok(json!({ "found": true, "as_of_week": week, "game": game })),
            None => Ok(json!({ "found": false, "roster_key": roster_key, "as_of_week": week })),
        }
    }

    /// Standings rows for `week`, best rank first.
    pub(crate) fn standings_rows(&self, week: Week) -> Result<Vec<StandingEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT tp.team_name, s.wins, s.losses, s.ties, s.points_for, s.points_against,
                    s.rank, s.streak_type, s.streak_len
             FROM standings s
             LEFT JOIN team_profiles tp
                ON tp.league_id = s.league_id AND tp.roster_id = s.roster_id
             WHERE s.week = ?1
             ORDER BY s.rank IS NULL, s.rank, s.wins DESC, s.points_for DESC, s.roster_id",
        )?;
        let rows = stmt
            .query_map(params![week.as_u16()], |row| {
                let (wins, losses, ties) = (row.get(1)?, row.get(2)?, row.get(3)?);
                Ok(StandingEntry {
                    team_name: row.get(0)?,
                    wins,
                    losses,
                    ties,
                    record: format_record(wins, losses, ties),
                    points_for: round2(row.get(4)?),
                    points_against: round2(row.get(5)?),
                    rank: row.get(6)?,
                    streak_type: row.get(7)?,
                    streak_len: row.get(8)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn get_standings(&self, week: Week) -> Result<Value> {
        let standings = self.standings_rows(week)?;
        if standings.is_empty() {
            return Ok(json!({ "found": false, "as_of_week": week }));
        }

        let league_average_match = self
            .conn
            .query_row("SELECT league_average_match FROM leagues LIMIT 1", [], |row| {
                row.get::<_, bool>(0)
            })
            .optional()?
            .unwrap_or(false);

        Ok(json!({
            "found": true,
            "as_of_week": week,
            "league_average_match": league_average_match,
            "standings": standings,
        }))
    }

    /// League identity plus the standings, games and transactions of `week`.
    pub fn get_league_snapshot(&self, week: Week) -> Result<Value> {
        let league = self
            .conn
            .query_row(
                "SELECT name, season, sport, playoff_week_start FROM leagues LIMIT 1",
                [],
                |row| {
                    Ok(json!({
                        "name": row.get::<_, String>(0)?,
                        "season": row.get::<_, String>(1)?,
                        "sport": row.get::<_, String>(2)?,
                        "playoff_week_start": row.get::<_, Option<u16>>(3)?,
                    }))
                },
            )
            .optional()?;
        let Some(league) = league else {
            return Ok(json!({ "found": false }));
        };

        Ok(json!({
            "found": true,
            "as_of_week": week,
            "league": league,
            "standings": self.standings_rows(week)?,
            "games": self.get_week_games(week)?,
            "transactions": self.get_transactions(week, week)?,
        }))
    }

    /// Top scorers of `week` across every roster, starters and bench alike.
    pub fn get_week_player_leaderboard(
        &self,
        week: Week,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.full_name, p.position, p.nfl_team, tp.team_name, pp.points, pp.role
             FROM player_performances pp
             LEFT JOIN players p ON p.player_id = pp.player_id
             LEFT JOIN team_profiles tp
                ON tp.league_id = pp.league_id AND tp.roster_id = pp.roster_id
             WHERE pp.week = ?1
             ORDER BY pp.points DESC, p.full_name
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![week.as_u16(), limit], |row| {
                Ok(LeaderboardEntry {
                    rank: 0,
                    player_name: row.get(0)?,
                    position: row.get(1)?,
                    nfl_team: row.get(2)?,
                    team_name: row.get(3)?,
                    points: round2(row.get(4)?),
                    role: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .zip(1..)
            .map(|(entry, rank)| LeaderboardEntry { rank, ..entry })
            .collect())
    }

    fn bench_totals(&self, week: Week, roster: Option<RosterId>) -> Result<Vec<BenchTotals>> {
        let mut stmt = self.conn.prepare(
            "SELECT tp.team_name,
                    SUM(CASE WHEN pp.role = 'starter' THEN pp.points ELSE 0 END),
                    SUM(CASE WHEN pp.role = 'starter' THEN 0 ELSE pp.points END)
             FROM player_performances pp
             LEFT JOIN team_profiles tp
                ON tp.league_id = pp.league_id AND tp.roster_id = pp.roster_id
             WHERE pp.week = ?1 AND (?2 IS NULL OR pp.roster_id = ?2)
             GROUP BY pp.roster_id
             ORDER BY 3 DESC, pp.roster_id",
        )?;
        let rows = stmt
            .query_map(params![week.as_u16(), roster.map(|r| r.as_u32())], |row| {
                let starter_points = round2(row.get::<_, Option<f64>>(1)?.unwrap_or(0.0));
                let bench_points = round2(row.get::<_, Option<f64>>(2)?.unwrap_or(0.0));
                Ok(BenchTotals {
                    team_name: row.get(0)?,
                    starter_points,
                    bench_points,
                    total_points: round2(starter_points + bench_points),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Points left on the bench in `week`.
    ///
    /// Without a roster key this is a league-wide list sorted by bench points;
    /// with one it is that team's totals plus its individual bench players.
    pub fn get_bench_analysis(&self, roster_key: Option<&str>, week: Week) -> Result<Value> {
        let Some(roster_key) = roster_key else {
            return Ok(json!(self.bench_totals(week, None)?));
        };

        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(with_week(miss, week)),
        };

        let totals = self
            .bench_totals(week, Some(team.roster_id))?
            .into_iter()
            .next();
        let (starter_points, bench_points) = totals
            .map(|t| (t.starter_points, t.bench_points))
            .unwrap_or((0.0, 0.0));

        let mut stmt = self.conn.prepare(
            "SELECT p.full_name, p.position, p.nfl_team, pp.points, pp.role
             FROM player_performances pp
             LEFT JOIN players p ON p.player_id = pp.player_id
             WHERE pp.week = ?1 AND pp.roster_id = ?2 AND pp.role != 'starter'
             ORDER BY pp.points DESC, p.full_name",
        )?;
        let bench_players = stmt
            .query_map(params![week.as_u16(), team.roster_id.as_u32()], |row| {
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

        Ok(json!({
            "found": true,
            "as_of_week": week,
            "team_name": team.team_name,
            "starter_points": starter_points,
            "bench_points": bench_points,
            "total_points": round2(starter_points + bench_points),
            "bench_players": bench_players,
        }))
    }
}

/// Add `as_of_week` to a resolver miss.
pub(crate) fn with_week(mut miss: Value, week: Week) -> Value {
    if let Some(fields) = miss.as_object_mut() {
        fields.insert("as_of_week".to_string(), json!(week));
    }
    miss
}
