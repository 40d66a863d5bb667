//! Player queries

use super::{helpers::round2, output::PlayerWeek};
use crate::{error::Result, storage::LeagueDatabase, Week};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};

impl LeagueDatabase {
    /// Identity, team and injury status for one player.
    pub fn get_player_summary(&self, player_key: &str, as_of_week: Week) -> Result<Value> {
        let resolved = match self
            .resolve_player_id(player_key)?
            .resolved_or_miss("player_key", player_key)
        {
            Ok(player) => player,
            Err(miss) => return Ok(miss),
        };

        let player = self
            .conn
            .query_row(
                "SELECT full_name, position, nfl_team, status, injury_status, age, years_exp
                 FROM players WHERE player_id = ?1",
                params![resolved.player_id.as_str()],
                |row| {
                    Ok(json!({
                        "player_name": row.get::<_, Option<String>>(0)?,
                        "position": row.get::<_, Option<String>>(1)?,
                        "nfl_team": row.get::<_, Option<String>>(2)?,
                        "status": row.get::<_, Option<String>>(3)?,
                        "injury_status": row.get::<_, Option<String>>(4)?,
                        "age": row.get::<_, Option<u16>>(5)?,
                        "years_exp": row.get::<_, Option<u16>>(6)?,
                    }))
                },
            )
            .optional()?;

        Ok(match player {
            Some(player) => json!({ "found": true, "as_of_week": as_of_week, "player": player }),
            None => json!({ "found": false, "player_key": player_key }),
        })
    }

    /// Week-by-week fantasy output for one player, optionally bounded.
    pub fn get_player_weekly_log(
        &self,
        player_key: &str,
        week_from: Option<Week>,
        week_to: Option<Week>,
    ) -> Result<Value> {
        let resolved = match self
            .resolve_player_id(player_key)?
            .resolved_or_miss("player_key", player_key)
        {
            Ok(player) => player,
            Err(miss) => return Ok(miss),
        };

        let mut stmt = self.conn.prepare(
            "SELECT pp.week, pp.points, pp.role, tp.team_name
             FROM player_performances pp
             LEFT JOIN team_profiles tp
                ON tp.league_id = pp.league_id AND tp.roster_id = pp.roster_id
             WHERE pp.player_id = ?1
               AND (?2 IS NULL OR pp.week >= ?2)
               AND (?3 IS NULL OR pp.week <= ?3)
             ORDER BY pp.week",
        )?;
        let performances = stmt
            .query_map(
                params![
                    resolved.player_id.as_str(),
                    week_from.map(|w| w.as_u16()),
                    week_to.map(|w| w.as_u16())
                ],
                |row| {
                    Ok(PlayerWeek {
                        week: row.get(0)?,
                        points: round2(row.get(1)?),
                        role: row.get(2)?,
                        team_name: row.get(3)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let weeks_played = performances.len();
        let total_points: f64 = performances.iter().map(|p| p.points).sum();
        let avg_points = if weeks_played > 0 {
            round2(total_points / weeks_played as f64)
        } else {
            0.0
        };

        let mut out = json!({
            "found": true,
            "player_name": resolved.player_name,
            "weeks_played": weeks_played,
            "total_points": round2(total_points),
            "avg_points": avg_points,
            "performances": performances,
        });
        if let Some(fields) = out.as_object_mut() {
            if let Some(week) = week_from {
                fields.insert("week_from".to_string(), json!(week));
            }
            if let Some(week) = week_to {
                fields.insert("week_to".to_string(), json!(week));
            }
        }
        Ok(out)
    }
}
