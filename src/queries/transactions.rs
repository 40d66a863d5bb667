//! Transaction queries
//!
//! Move rows are regrouped into one summary per transaction, with each
//! involved team's received and sent assets listed together.

use super::{
    league::with_week,
    output::{Asset, TransactionSide, TransactionSummary},
};
use crate::{error::Result, storage::LeagueDatabase, RosterId, Week};
use rusqlite::{params, Row};
use serde_json::{json, Value};

const UNKNOWN_TEAM: &str = "Unknown";

/// Transactions joined to their moves, newest first. Bind `?1`/`?2` to the
/// week range and `?3` to an optional roster filter.
const TRANSACTION_MOVES_SQL: &str = "
    SELECT t.transaction_id, t.week, t.type, t.status, t.created_ts,
        m.asset_type, m.direction, m.bid_amount, tp.team_name,
        p.full_name, p.position, p.age, p.years_exp,
        m.pick_season, m.pick_round, tpo.team_name
     FROM transactions t
     JOIN transaction_moves m ON m.transaction_id = t.transaction_id
     LEFT JOIN players p ON p.player_id = m.player_id
     LEFT JOIN team_profiles tp
        ON tp.league_id = t.league_id AND tp.roster_id = m.roster_id
     LEFT JOIN team_profiles tpo
        ON tpo.league_id = t.league_id AND tpo.roster_id = m.pick_original_roster_id
     WHERE t.week BETWEEN ?1 AND ?2
       AND (?3 IS NULL OR t.transaction_id IN
            (SELECT transaction_id FROM transaction_moves WHERE roster_id = ?3))
     ORDER BY t.week DESC, t.created_ts DESC, t.transaction_id, m.rowid";

struct MoveRow {
    transaction_id: String,
    week: u16,
    kind: String,
    status: Option<String>,
    created_ts: Option<i64>,
    direction: String,
    bid_amount: Option<i64>,
    team_name: Option<String>,
    asset: Asset,
}

fn move_row(row: &Row<'_>) -> rusqlite::Result<MoveRow> {
    let asset_type: String = row.get(5)?;
    let asset = if asset_type == "pick" {
        Asset {
            asset_type,
            pick_season: row.get(13)?,
            pick_round: row.get(14)?,
            pick_original_team_name: row.get(15)?,
            ..Asset::default()
        }
    } else {
        Asset {
            asset_type,
            player_name: row.get(9)?,
            position: row.get(10)?,
            age: row.get(11)?,
            years_exp: row.get(12)?,
            ..Asset::default()
        }
    };

    Ok(MoveRow {
        transaction_id: row.get(0)?,
        week: row.get(1)?,
        kind: row.get(2)?,
        status: row.get(3)?,
        created_ts: row.get(4)?,
        direction: row.get(6)?,
        bid_amount: row.get(7)?,
        team_name: row.get(8)?,
        asset,
    })
}

impl TransactionSummary {
    fn side_mut(&mut self, team_name: String) -> &mut TransactionSide {
        let index = match self.details.iter().position(|d| d.team_name == team_name) {
            Some(index) => index,
            None => {
                self.details.push(TransactionSide {
                    team_name,
                    assets_received: Vec::new(),
                    assets_sent: Vec::new(),
                });
                self.details.len() - 1
            }
        };
        &mut self.details[index]
    }
}

/// Fold ordered move rows into per-transaction summaries, keeping order.
fn group_moves(rows: Vec<MoveRow>) -> Vec<TransactionSummary> {
    let mut summaries: Vec<TransactionSummary> = Vec::new();
    let mut current_id: Option<String> = None;

    for row in rows {
        if current_id.as_deref() != Some(row.transaction_id.as_str()) {
            summaries.push(TransactionSummary {
                week: row.week,
                kind: row.kind.clone(),
                status: row.status.clone(),
                created_ts: row.created_ts,
                bid_amount: None,
                details: Vec::new(),
            });
            current_id = Some(row.transaction_id.clone());
        }
        let Some(summary) = summaries.last_mut() else {
            continue;
        };

        if summary.kind != "trade" && summary.bid_amount.is_none() {
            summary.bid_amount = row.bid_amount;
        }

        let team_name = row.team_name.unwrap_or_else(|| UNKNOWN_TEAM.to_string());
        let side = summary.side_mut(team_name);
        match row.direction.as_str() {
            "add" | "pick_in" => side.assets_received.push(row.asset),
            _ => side.assets_sent.push(row.asset),
        }
    }
    summaries
}

impl LeagueDatabase {
    fn transaction_summaries(
        &self,
        week_from: Week,
        week_to: Week,
        roster: Option<RosterId>,
    ) -> Result<Vec<TransactionSummary>> {
        let mut stmt = self.conn.prepare(TRANSACTION_MOVES_SQL)?;
        let rows = stmt
            .query_map(
                params![
                    week_from.as_u16(),
                    week_to.as_u16(),
                    roster.map(|r| r.as_u32())
                ],
                move_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(group_moves(rows))
    }

    /// League-wide transactions between two weeks, inclusive, newest first.
    pub fn get_transactions(
        &self,
        week_from: Week,
        week_to: Week,
    ) -> Result<Vec<TransactionSummary>> {
        self.transaction_summaries(week_from, week_to, None)
    }

    /// Transactions one team took part in between two weeks, inclusive.
    pub fn get_team_transactions(
        &self,
        roster_key: &str,
        week_from: Week,
        week_to: Week,
    ) -> Result<Value> {
        let team = match self
            .resolve_roster_id(roster_key)?
            .resolved_or_miss("roster_key", roster_key)
        {
            Ok(team) => team,
            Err(miss) => return Ok(with_week(miss, week_to)),
        };

        let transactions = self.transaction_summaries(week_from, week_to, Some(team.roster_id))?;
        Ok(json!({
            "found": true,
            "team_name": team.team_name,
            "week_from": week_from,
            "week_to": week_to,
            "transactions": transactions,
        }))
    }
}
