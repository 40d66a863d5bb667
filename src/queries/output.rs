//! Output models returned by the query layer.
//!
//! Outputs carry display names rather than internal ids, so a consumer can
//! quote them directly. Fields that are unknown for a row are omitted
//! rather than serialized as `null` where the shape allows it.

use serde::Serialize;
use std::collections::BTreeMap;

/// One player line inside a lineup breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerLine {
    pub player_name: Option<String>,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    pub role: String,
}

/// Players grouped into the six fantasy position buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionGroups {
    pub qb: Vec<PlayerLine>,
    pub rb: Vec<PlayerLine>,
    pub wr: Vec<PlayerLine>,
    pub te: Vec<PlayerLine>,
    pub k: Vec<PlayerLine>,
    pub def: Vec<PlayerLine>,
}

/// Starters and everyone else, each grouped by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineupBreakdown {
    pub starters: PositionGroups,
    pub bench: PositionGroups,
}

/// A head-to-head result with team names resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGame {
    pub week: u16,
    pub matchup_id: u32,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub points_a: f64,
    pub points_b: f64,
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameWithPlayers {
    #[serde(flatten)]
    pub game: WeekGame,
    pub team_a_players: LineupBreakdown,
    pub team_b_players: LineupBreakdown,
}

/// One row of a standings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingEntry {
    pub team_name: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub record: String,
    pub points_for: f64,
    pub points_against: f64,
    pub rank: Option<u32>,
    pub streak_type: Option<String>,
    pub streak_len: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_name: Option<String>,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub team_name: Option<String>,
    pub points: f64,
    pub role: String,
}

/// Starter versus bench scoring for one roster in one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchTotals {
    pub team_name: Option<String>,
    pub starter_points: f64,
    pub bench_points: f64,
    pub total_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub team_name: Option<String>,
    pub manager_name: Option<String>,
}

/// One game from a single team's point of view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub week: u16,
    pub opponent_name: Option<String>,
    pub team_points: f64,
    pub opponent_points: f64,
    /// "W", "L" or "T"
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_after_week: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickOwnership {
    pub season: String,
    pub round: u16,
    pub original_team_name: Option<String>,
    pub current_team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerWeek {
    pub week: u16,
    pub points: f64,
    pub role: String,
    pub team_name: Option<String>,
}

/// A player or pick changing hands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Asset {
    pub asset_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_exp: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_round: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_original_team_name: Option<String>,
}

/// What one team sent and received in a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSide {
    pub team_name: String,
    pub assets_received: Vec<Asset>,
    pub assets_sent: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub week: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub created_ts: Option<i64>,
    /// Waiver bid or free-agent price; never reported for trades
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_amount: Option<i64>,
    pub details: Vec<TransactionSide>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketMatchup {
    pub matchup_id: u32,
    pub round: u16,
    pub team_1: Option<String>,
    pub team_2: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
    /// "complete" once a winner is recorded, else "pending"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub placement: u16,
    pub team_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BracketView {
    pub rounds: BTreeMap<u16, Vec<BracketMatchup>>,
    pub champion: Option<String>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayoffStep {
    pub round: u16,
    pub matchup_id: u32,
    pub opponent: Option<String>,
    /// "win", "loss" or "pending"
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<u16>,
}
