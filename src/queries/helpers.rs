//! Shared formatting and row-mapping helpers for the query modules

use super::output::{LineupBreakdown, PlayerLine, PositionGroups, TeamSummary, WeekGame};
use crate::{error::Result, storage::LeagueDatabase, RosterId};
use rusqlite::{params, OptionalExtension, Row};

pub use crate::normalize::round2;

/// Position buckets in display order.
pub const POSITIONS: [&str; 6] = ["qb", "rb", "wr", "te", "k", "def"];

/// "W-L", or "W-L-T" when there are ties.
pub fn format_record(wins: u32, losses: u32, ties: u32) -> String {
    if ties > 0 {
        format!("{}-{}-{}", wins, losses, ties)
    } else {
        format!("{}-{}", wins, losses)
    }
}

impl PositionGroups {
    /// Bucket for a raw position string; anything unrecognised lands in `def`.
    fn bucket_mut(&mut self, position: Option<&str>) -> &mut Vec<PlayerLine> {
        match position.map(str::to_ascii_uppercase).as_deref() {
            Some("QB") => &mut self.qb,
            Some("RB") => &mut self.rb,
            Some("WR") => &mut self.wr,
            Some("TE") => &mut self.te,
            Some("K") => &mut self.k,
            _ => &mut self.def,
        }
    }

    fn sort(&mut self) {
        for bucket in [
            &mut self.qb,
            &mut self.rb,
            &mut self.wr,
            &mut self.te,
            &mut self.k,
            &mut self.def,
        ] {
            bucket.sort_by(|a, b| {
                b.points
                    .unwrap_or(0.0)
                    .total_cmp(&a.points.unwrap_or(0.0))
                    .then_with(|| a.player_name.cmp(&b.player_name))
            });
        }
    }

    pub fn len(&self) -> usize {
        self.qb.len()
            + self.rb.len()
            + self.wr.len()
            + self.te.len()
            + self.k.len()
            + self.def.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LineupBreakdown {
    /// Split players into starters and bench, then group by position.
    ///
    /// Only the `starter` role counts as a starter; taxi, reserve and IR
    /// players are listed with the bench.
    pub fn organize(players: Vec<PlayerLine>) -> Self {
        let mut breakdown = Self::default();
        for player in players {
            let side = if player.role == "starter" {
                &mut breakdown.starters
            } else {
                &mut breakdown.bench
            };
            side.bucket_mut(player.position.as_deref()).push(player);
        }
        breakdown.starters.sort();
        breakdown.bench.sort();
        breakdown
    }
}

/// Game rows joined to both team names. Bind `?1` to the week.
pub(crate) const WEEK_GAME_SQL: &str = "SELECT g.week, g.matchup_id, g.points_a, g.points_b,
        tpa.team_name, tpb.team_name,
        CASE
            WHEN g.winner_roster_id = g.roster_id_a THEN tpa.team_name
            WHEN g.winner_roster_id = g.roster_id_b THEN tpb.team_name
        END,
        g.roster_id_a, g.roster_id_b, g.winner_roster_id
     FROM games g
     LEFT JOIN team_profiles tpa
        ON tpa.league_id = g.league_id AND tpa.roster_id = g.roster_id_a
     LEFT JOIN team_profiles tpb
        ON tpb.league_id = g.league_id AND tpb.roster_id = g.roster_id_b";

/// Map a row selected by [`WEEK_GAME_SQL`] to the game and both roster ids.
pub(crate) fn week_game_row(row: &Row<'_>) -> rusqlite::Result<(WeekGame, RosterId, RosterId)> {
    Ok((
        WeekGame {
            week: row.get(0)?,
            matchup_id: row.get(1)?,
            points_a: round2(row.get(2)?),
            points_b: round2(row.get(3)?),
            team_a: row.get(4)?,
            team_b: row.get(5)?,
            winner: row.get(6)?,
        },
        RosterId::new(row.get(7)?),
        RosterId::new(row.get(8)?),
    ))
}

impl LeagueDatabase {
    pub(crate) fn team_summary(&self, roster_id: RosterId) -> Result<Option<TeamSummary>> {
        let summary = self
            .conn
            .query_row(
                "SELECT team_name, manager_name FROM team_profiles WHERE roster_id = ?1",
                params![roster_id.as_u32()],
                |row| {
                    Ok(TeamSummary {
                        team_name: row.get(0)?,
                        manager_name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(summary)
    }

    pub(crate) fn playoff_week_start(&self) -> Result<Option<u16>> {
        let start = self
            .conn
            .query_row("SELECT playoff_week_start FROM leagues LIMIT 1", [], |row| {
                row.get::<_, Option<u16>>(0)
            })
            .optional()?;
        Ok(start.flatten())
    }
}
