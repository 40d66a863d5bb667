//! Typed records for the storage layer
//!
//! Each record knows which table it belongs to and renders its column values
//! in the order declared by that table's [`TableSpec`].

use super::schema::{self, TableSpec};
use crate::cli::types::{LeagueId, PlayerId, RosterId, Season, Week};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A row that can be bulk-inserted into its table.
pub trait Record {
    const TABLE: &'static TableSpec;

    /// Column values in the same order as `TABLE.columns`.
    fn values(&self) -> Vec<Value>;
}

fn text(s: impl fmt::Display) -> Value {
    Value::Text(s.to_string())
}

fn opt_text<T: fmt::Display>(s: Option<&T>) -> Value {
    s.map(|v| Value::Text(v.to_string())).unwrap_or(Value::Null)
}

fn json_text<T: Serialize>(value: &T) -> Value {
    serde_json::to_string(value)
        .map(Value::Text)
        .unwrap_or(Value::Null)
}

fn roster(id: RosterId) -> Value {
    Value::from(id.as_u32())
}

fn opt_roster(id: Option<RosterId>) -> Value {
    id.map(roster).unwrap_or(Value::Null)
}

/// Role a player occupies on a roster or in a weekly lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterRole {
    Starter,
    Taxi,
    Reserve,
    Ir,
    Bench,
}

impl RosterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterRole::Starter => "starter",
            RosterRole::Taxi => "taxi",
            RosterRole::Reserve => "reserve",
            RosterRole::Ir => "ir",
            RosterRole::Bench => "bench",
        }
    }
}

impl fmt::Display for RosterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakType {
    W,
    L,
}

impl fmt::Display for StreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreakType::W => f.write_str("W"),
            StreakType::L => f.write_str("L"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Player,
    Pick,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Player => f.write_str("player"),
            AssetType::Pick => f.write_str("pick"),
        }
    }
}

/// Which side of a transaction a move row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Add,
    Drop,
    PickOut,
    PickIn,
}

impl MoveDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::Add => "add",
            MoveDirection::Drop => "drop",
            MoveDirection::PickOut => "pick_out",
            MoveDirection::PickIn => "pick_in",
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketType {
    Winners,
    Losers,
}

impl BracketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BracketType::Winners => "winners",
            BracketType::Losers => "losers",
        }
    }
}

impl fmt::Display for BracketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BracketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winners" => Ok(BracketType::Winners),
            "losers" => Ok(BracketType::Losers),
            other => Err(format!("bracket_type must be winners or losers, got {other:?}")),
        }
    }
}

/// League identity and configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: LeagueId,
    pub season: Season,
    pub name: String,
    pub sport: String,
    pub scoring_settings_json: Option<String>,
    pub roster_positions_json: Option<String>,
    pub playoff_week_start: Option<Week>,
    pub playoff_teams: Option<u16>,
    /// League awards an extra result each week against the median score
    pub league_average_match: bool,
    pub draft_rounds: u16,
}

impl Record for League {
    const TABLE: &'static TableSpec = &schema::LEAGUES;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            text(&self.name),
            text(&self.sport),
            opt_text(self.scoring_settings_json.as_ref()),
            opt_text(self.roster_positions_json.as_ref()),
            self.playoff_week_start.map(|w| w.as_u16()).into(),
            self.playoff_teams.into(),
            self.league_average_match.into(),
            self.draft_rounds.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonContext {
    pub league_id: LeagueId,
    pub computed_week: Week,
    pub override_week: Option<Week>,
    pub effective_week: Week,
    pub generated_at: String,
}

impl Record for SeasonContext {
    const TABLE: &'static TableSpec = &schema::SEASON_CONTEXT;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            self.computed_week.as_u16().into(),
            self.override_week.map(|w| w.as_u16()).into(),
            self.effective_week.as_u16().into(),
            text(&self.generated_at),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub display_name: String,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub metadata_json: Option<String>,
}

impl Record for User {
    const TABLE: &'static TableSpec = &schema::USERS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.user_id),
            text(&self.display_name),
            opt_text(self.username.as_ref()),
            opt_text(self.avatar.as_ref()),
            opt_text(self.metadata_json.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub league_id: LeagueId,
    pub roster_id: RosterId,
    pub owner_user_id: Option<String>,
    pub settings_json: Option<String>,
    pub metadata_json: Option<String>,
    /// Week-by-week result string such as "WWLWT"
    pub record_string: Option<String>,
}

impl Record for Roster {
    const TABLE: &'static TableSpec = &schema::ROSTERS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            roster(self.roster_id),
            opt_text(self.owner_user_id.as_ref()),
            opt_text(self.settings_json.as_ref()),
            opt_text(self.metadata_json.as_ref()),
            opt_text(self.record_string.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub league_id: LeagueId,
    pub roster_id: RosterId,
    pub player_id: PlayerId,
    pub role: RosterRole,
}

impl Record for RosterPlayer {
    const TABLE: &'static TableSpec = &schema::ROSTER_PLAYERS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            roster(self.roster_id),
            text(&self.player_id),
            text(self.role),
        ]
    }
}

/// Display identity for a roster, precomputed from the roster and its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub league_id: LeagueId,
    pub roster_id: RosterId,
    pub team_name: Option<String>,
    pub manager_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Record for TeamProfile {
    const TABLE: &'static TableSpec = &schema::TEAM_PROFILES;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            roster(self.roster_id),
            opt_text(self.team_name.as_ref()),
            opt_text(self.manager_name.as_ref()),
            opt_text(self.avatar_url.as_ref()),
        ]
    }
}

/// Ownership of one future draft slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub league_id: LeagueId,
    pub season: Season,
    pub round: u16,
    pub original_roster_id: RosterId,
    pub current_roster_id: RosterId,
    pub pick_id: Option<String>,
    /// "seed" until a traded-pick record reassigns it, then "traded"
    pub source: String,
}

impl Record for DraftPick {
    const TABLE: &'static TableSpec = &schema::DRAFT_PICKS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            self.round.into(),
            roster(self.original_roster_id),
            roster(self.current_roster_id),
            opt_text(self.pick_id.as_ref()),
            text(&self.source),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub status: Option<String>,
    pub injury_status: Option<String>,
    pub age: Option<u16>,
    pub years_exp: Option<u16>,
    pub metadata_json: Option<String>,
}

impl Record for Player {
    const TABLE: &'static TableSpec = &schema::PLAYERS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.player_id),
            opt_text(self.full_name.as_ref()),
            opt_text(self.position.as_ref()),
            opt_text(self.nfl_team.as_ref()),
            opt_text(self.status.as_ref()),
            opt_text(self.injury_status.as_ref()),
            self.age.into(),
            self.years_exp.into(),
            opt_text(self.metadata_json.as_ref()),
        ]
    }
}

/// One roster's raw result for a week, before pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRow {
    pub league_id: LeagueId,
    pub season: Season,
    pub week: Week,
    pub matchup_id: u32,
    pub roster_id: RosterId,
    pub points: f64,
    pub starters: Vec<PlayerId>,
    pub players: Vec<PlayerId>,
    pub players_points: BTreeMap<PlayerId, f64>,
}

impl Record for MatchupRow {
    const TABLE: &'static TableSpec = &schema::MATCHUPS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            self.week.as_u16().into(),
            self.matchup_id.into(),
            roster(self.roster_id),
            self.points.into(),
            json_text(&self.starters),
            json_text(&self.players),
            json_text(&self.players_points),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    pub league_id: LeagueId,
    pub season: Season,
    pub week: Week,
    pub player_id: PlayerId,
    pub roster_id: RosterId,
    pub matchup_id: u32,
    pub points: f64,
    pub role: RosterRole,
}

impl Record for PlayerPerformance {
    const TABLE: &'static TableSpec = &schema::PLAYER_PERFORMANCES;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            self.week.as_u16().into(),
            text(&self.player_id),
            roster(self.roster_id),
            self.matchup_id.into(),
            self.points.into(),
            text(self.role),
        ]
    }
}

/// Head-to-head pairing of two matchup rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub league_id: LeagueId,
    pub season: Season,
    pub week: Week,
    pub matchup_id: u32,
    pub roster_id_a: RosterId,
    pub roster_id_b: RosterId,
    pub points_a: f64,
    pub points_b: f64,
    pub winner_roster_id: Option<RosterId>,
    pub is_playoffs: bool,
}

impl Record for Game {
    const TABLE: &'static TableSpec = &schema::GAMES;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            self.week.as_u16().into(),
            self.matchup_id.into(),
            roster(self.roster_id_a),
            roster(self.roster_id_b),
            self.points_a.into(),
            self.points_b.into(),
            opt_roster(self.winner_roster_id),
            self.is_playoffs.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsWeek {
    pub league_id: LeagueId,
    pub season: Season,
    pub week: Week,
    pub roster_id: RosterId,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub rank: Option<u32>,
    pub streak_type: Option<StreakType>,
    pub streak_len: Option<u32>,
}

impl Record for StandingsWeek {
    const TABLE: &'static TableSpec = &schema::STANDINGS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            self.week.as_u16().into(),
            roster(self.roster_id),
            self.wins.into(),
            self.losses.into(),
            self.ties.into(),
            self.points_for.into(),
            self.points_against.into(),
            self.rank.into(),
            opt_text(self.streak_type.as_ref()),
            self.streak_len.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub league_id: LeagueId,
    pub season: Season,
    pub week: Week,
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub created_ts: Option<i64>,
    pub settings_json: Option<String>,
    pub metadata_json: Option<String>,
}

impl Record for Transaction {
    const TABLE: &'static TableSpec = &schema::TRANSACTIONS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            self.week.as_u16().into(),
            text(&self.transaction_id),
            text(&self.kind),
            opt_text(self.status.as_ref()),
            self.created_ts.into(),
            opt_text(self.settings_json.as_ref()),
            opt_text(self.metadata_json.as_ref()),
        ]
    }
}

/// One asset moved by a transaction, seen from `roster_id`'s side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionMove {
    pub transaction_id: String,
    pub roster_id: Option<RosterId>,
    pub player_id: Option<PlayerId>,
    pub asset_type: AssetType,
    pub direction: MoveDirection,
    pub bid_amount: Option<i64>,
    pub from_roster_id: Option<RosterId>,
    pub to_roster_id: Option<RosterId>,
    pub pick_season: Option<String>,
    pub pick_round: Option<u16>,
    pub pick_original_roster_id: Option<RosterId>,
    pub pick_id: Option<String>,
}

impl Record for TransactionMove {
    const TABLE: &'static TableSpec = &schema::TRANSACTION_MOVES;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.transaction_id),
            opt_roster(self.roster_id),
            opt_text(self.player_id.as_ref()),
            text(self.asset_type),
            text(self.direction),
            self.bid_amount.into(),
            opt_roster(self.from_roster_id),
            opt_roster(self.to_roster_id),
            opt_text(self.pick_season.as_ref()),
            self.pick_round.into(),
            opt_roster(self.pick_original_roster_id),
            opt_text(self.pick_id.as_ref()),
        ]
    }
}

/// One node of a playoff bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffMatchup {
    pub league_id: LeagueId,
    pub season: Season,
    pub bracket_type: BracketType,
    pub round: u16,
    pub matchup_id: u32,
    pub t1_roster_id: Option<RosterId>,
    pub t2_roster_id: Option<RosterId>,
    pub t1_from_matchup_id: Option<u32>,
    /// "w" or "l": the slot is filled by that matchup's winner or loser
    pub t1_from_outcome: Option<String>,
    pub t2_from_matchup_id: Option<u32>,
    pub t2_from_outcome: Option<String>,
    pub winner_roster_id: Option<RosterId>,
    pub loser_roster_id: Option<RosterId>,
    pub placement: Option<u16>,
}

impl Record for PlayoffMatchup {
    const TABLE: &'static TableSpec = &schema::PLAYOFF_MATCHUPS;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.league_id),
            text(self.season),
            text(self.bracket_type),
            self.round.into(),
            self.matchup_id.into(),
            opt_roster(self.t1_roster_id),
            opt_roster(self.t2_roster_id),
            self.t1_from_matchup_id.into(),
            opt_text(self.t1_from_outcome.as_ref()),
            self.t2_from_matchup_id.into(),
            opt_text(self.t2_from_outcome.as_ref()),
            opt_roster(self.winner_roster_id),
            opt_roster(self.loser_roster_id),
            self.placement.into(),
        ]
    }
}
