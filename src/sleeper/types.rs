//! Raw Sleeper payload contracts
//!
//! The Sleeper API is loosely typed: ids arrive as strings or numbers, numeric
//! fields are sometimes quoted, and optional fields are frequently `null`.
//! These structs accept all of those shapes at the boundary so the
//! normalizers can work with plain Rust types. Required ids have no default,
//! so a payload missing one fails to deserialize.

use crate::error::{Result, SleeperError};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

#[cfg(test)]
mod tests;

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn de_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    value_to_string(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("expected an id, got {}", raw)))
}

fn de_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(value_to_string(&raw))
}

fn de_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    value_to_u64(&raw)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer id, got {}", raw)))
}

fn de_opt_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(value_to_u64(&raw).and_then(|n| u32::try_from(n).ok()))
}

fn de_opt_u16<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(value_to_u64(&raw).and_then(|n| u16::try_from(n).ok()))
}

fn de_opt_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match &raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn de_f64_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&raw).unwrap_or(0.0))
}

fn de_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Bool(b) => b,
        other => value_to_u64(&other).map(|n| n != 0).unwrap_or(false),
    })
}

/// List of player ids; nulls and blanks are dropped, a non-list is empty.
fn de_id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Array(items) => items.iter().filter_map(value_to_string).collect(),
        _ => Vec::new(),
    })
}

/// Player id -> points; entries with non-numeric points are dropped.
fn de_points_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| value_to_f64(v).map(|p| (k.clone(), p)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Player id -> roster id, as used by transaction adds/drops.
fn de_roster_map<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), value_to_u64(v).and_then(|n| u32::try_from(n).ok())))
            .collect(),
        _ => BTreeMap::new(),
    })
}

fn de_opt_object<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Null => None,
        other => Some(other),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLeagueSettings {
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub playoff_week_start: Option<u16>,
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub playoff_teams: Option<u16>,
    #[serde(default, deserialize_with = "de_flag")]
    pub league_average_match: bool,
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub draft_rounds: Option<u16>,
}

/// `GET /league/{league_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawLeague {
    #[serde(deserialize_with = "de_id")]
    pub league_id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub sport: Option<String>,
    #[serde(default)]
    pub settings: Option<RawLeagueSettings>,
    #[serde(default, deserialize_with = "de_opt_object")]
    pub scoring_settings: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_object")]
    pub roster_positions: Option<Value>,
}

/// One entry of `GET /league/{league_id}/users`
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(deserialize_with = "de_id")]
    pub user_id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "de_opt_object")]
    pub metadata: Option<Value>,
}

/// One entry of `GET /league/{league_id}/rosters`
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoster {
    #[serde(deserialize_with = "de_u32")]
    pub roster_id: u32,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "de_id_list")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "de_id_list")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "de_id_list")]
    pub taxi: Vec<String>,
    #[serde(default, deserialize_with = "de_id_list")]
    pub reserve: Vec<String>,
    #[serde(default, deserialize_with = "de_id_list")]
    pub ir: Vec<String>,
    #[serde(default, deserialize_with = "de_opt_object")]
    pub settings: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_object")]
    pub metadata: Option<Value>,
}

impl RawRoster {
    /// First non-empty string among `keys` in the roster metadata.
    pub fn metadata_str(&self, keys: &[&str]) -> Option<String> {
        let metadata = self.metadata.as_ref()?;
        keys.iter()
            .filter_map(|key| metadata.get(*key))
            .find_map(value_to_string)
    }
}

/// One value of the `GET /players/nfl` dictionary
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub player_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub injury_status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub age: Option<u16>,
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub years_exp: Option<u16>,
}

/// One entry of `GET /league/{league_id}/matchups/{week}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatchup {
    #[serde(deserialize_with = "de_u32")]
    pub roster_id: u32,
    /// Null for teams without a game that week (eliminated in the playoffs)
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub matchup_id: Option<u32>,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub points: f64,
    #[serde(default, deserialize_with = "de_id_list")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "de_id_list")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "de_points_map")]
    pub players_points: BTreeMap<String, f64>,
}

/// A draft pick as it appears in `traded_picks` and in transactions
#[derive(Debug, Clone, Deserialize)]
pub struct RawDraftPick {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub round: Option<u16>,
    /// Roster that originally owned the pick
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub roster_id: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub owner_id: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub previous_owner_id: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub draft_pick_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransactionSettings {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub waiver_bid: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub price: Option<i64>,
}

/// One entry of `GET /league/{league_id}/transactions/{week}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    #[serde(deserialize_with = "de_id")]
    pub transaction_id: String,
    #[serde(rename = "type", default, deserialize_with = "de_opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub created: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_object")]
    pub settings: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_object")]
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "de_roster_map")]
    pub adds: BTreeMap<String, Option<u32>>,
    #[serde(default, deserialize_with = "de_roster_map")]
    pub drops: BTreeMap<String, Option<u32>>,
    #[serde(default)]
    pub draft_picks: Option<Vec<RawDraftPick>>,
}

impl RawTransaction {
    /// FAAB bid (waivers) or price (free agency), whichever is set.
    pub fn bid_amount(&self) -> Option<i64> {
        let settings = self
            .settings
            .as_ref()
            .and_then(|v| RawTransactionSettings::deserialize(v).ok())
            .unwrap_or_default();
        settings
            .waiver_bid
            .filter(|b| *b != 0)
            .or(settings.price.filter(|p| *p != 0))
    }
}

/// `GET /state/nfl`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawState {
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub week: Option<u16>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub season_type: Option<String>,
}

/// `{"w": m}` or `{"l": m}`: the winner or loser of bracket matchup `m`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBracketRef {
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub w: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub l: Option<u32>,
}

impl RawBracketRef {
    /// `(matchup_id, "w" | "l")`
    pub fn outcome(&self) -> Option<(u32, &'static str)> {
        self.w
            .map(|m| (m, "w"))
            .or_else(|| self.l.map(|m| (m, "l")))
    }
}

/// One node of `GET /league/{league_id}/winners_bracket` (or losers)
#[derive(Debug, Clone, Deserialize)]
pub struct RawBracketMatchup {
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub r: Option<u16>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub m: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub t1: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub t2: Option<u32>,
    #[serde(default, deserialize_with = "de_bracket_ref")]
    pub t1_from: Option<RawBracketRef>,
    #[serde(default, deserialize_with = "de_bracket_ref")]
    pub t2_from: Option<RawBracketRef>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub w: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub l: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u16")]
    pub p: Option<u16>,
}

fn de_bracket_ref<'de, D>(deserializer: D) -> std::result::Result<Option<RawBracketRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match &raw {
        Value::Object(_) => RawBracketRef::deserialize(&raw).ok(),
        _ => None,
    })
}

/// Parse a JSON array of `T`, treating `null` as empty.
///
/// Any element that fails its contract aborts with a `Normalize` error for `entity`.
pub fn parse_list<T: DeserializeOwned>(entity: &'static str, raw: &Value) -> Result<Vec<T>> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| T::deserialize(item).map_err(|e| SleeperError::normalize(entity, e)))
            .collect(),
        other => Err(SleeperError::normalize(
            entity,
            format!("expected a list, got {}", json_kind(other)),
        )),
    }
}

/// Parse a single JSON object of `T`.
pub fn parse_one<T: DeserializeOwned>(entity: &'static str, raw: &Value) -> Result<T> {
    T::deserialize(raw).map_err(|e| SleeperError::normalize(entity, e))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
