//! Name and id resolution for human-supplied player and roster keys

use crate::{error::Result, storage::LeagueDatabase, PlayerId, RosterId};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use serde_json::{json, Value};

/// Outcome of resolving a human-supplied key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolution<T> {
    Resolved(T),
    NotFound,
    Ambiguous(Vec<T>),
}

impl<T: Serialize> Resolution<T> {
    /// The resolved value, or the structured miss a query returns in its place.
    ///
    /// Misses echo the key under `key_field`; ambiguity adds the candidates
    /// under `matches`.
    pub fn resolved_or_miss(self, key_field: &str, key: &str) -> std::result::Result<T, Value> {
        match self {
            Resolution::Resolved(value) => Ok(value),
            Resolution::NotFound => Err(json!({ "found": false, key_field: key })),
            Resolution::Ambiguous(matches) => {
                Err(json!({ "found": false, key_field: key, "matches": matches }))
            }
        }
    }

    /// Render as the response of the standalone resolver tools.
    pub fn to_json(&self, key_field: &str, key: &str) -> Value {
        match self {
            Resolution::Resolved(value) => {
                let mut out = json!({ "found": true });
                if let (Some(out), Value::Object(fields)) = (out.as_object_mut(), json!(value)) {
                    out.extend(fields);
                }
                out
            }
            Resolution::NotFound => json!({ "found": false, key_field: key }),
            Resolution::Ambiguous(matches) => {
                json!({ "found": false, key_field: key, "matches": matches })
            }
        }
    }
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatch {
    pub player_id: PlayerId,
    pub player_name: Option<String>,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub age: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterMatch {
    pub roster_id: RosterId,
    pub team_name: Option<String>,
    pub manager_name: Option<String>,
}

fn player_match(row: &Row<'_>) -> rusqlite::Result<PlayerMatch> {
    Ok(PlayerMatch {
        player_id: PlayerId::new(row.get::<_, String>(0)?),
        player_name: row.get(1)?,
        position: row.get(2)?,
        nfl_team: row.get(3)?,
        age: row.get(4)?,
    })
}

fn roster_match(row: &Row<'_>) -> rusqlite::Result<RosterMatch> {
    Ok(RosterMatch {
        roster_id: RosterId::new(row.get(0)?),
        team_name: row.get(1)?,
        manager_name: row.get(2)?,
    })
}

fn from_matches<T>(mut matches: Vec<T>) -> Resolution<T> {
    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Resolved(matches.remove(0)),
        _ => Resolution::Ambiguous(matches),
    }
}

impl LeagueDatabase {
    /// Resolve a player id or full name.
    ///
    /// An exact `player_id` match wins. A key shaped like a numeric id is
    /// returned as-is even when no player row exists. Otherwise the key is
    /// matched case-insensitively against full names.
    pub fn resolve_player_id(&self, key: &str) -> Result<Resolution<PlayerMatch>> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(Resolution::NotFound);
        }

        let by_id = self
            .conn
            .query_row(
                "SELECT player_id, full_name, position, nfl_team, age
                 FROM players WHERE player_id = ?1",
                params![key],
                player_match,
            )
            .optional()?;
        if let Some(found) = by_id {
            return Ok(Resolution::Resolved(found));
        }

        if PlayerId::looks_like_id(key) {
            return Ok(Resolution::Resolved(PlayerMatch {
                player_id: PlayerId::new(key),
                player_name: None,
                position: None,
                nfl_team: None,
                age: None,
            }));
        }

        let mut stmt = self.conn.prepare(
            "SELECT player_id, full_name, position, nfl_team, age
             FROM players
             WHERE full_name IS NOT NULL AND lower(full_name) = lower(?1)
             ORDER BY full_name, player_id",
        )?;
        let matches = stmt
            .query_map(params![key], player_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(from_matches(matches))
    }

    /// Resolve a roster id, team name or manager name.
    ///
    /// Digit-only keys are looked up as roster ids; anything else is matched
    /// case-insensitively against team and manager names.
    pub fn resolve_roster_id(&self, key: &str) -> Result<Resolution<RosterMatch>> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(Resolution::NotFound);
        }

        if key.chars().all(|c| c.is_ascii_digit()) {
            let Ok(roster_id) = key.parse::<u32>() else {
                return Ok(Resolution::NotFound);
            };
            let found = self
                .conn
                .query_row(
                    "SELECT r.roster_id, tp.team_name, tp.manager_name
                     FROM rosters r
                     LEFT JOIN team_profiles tp
                        ON tp.league_id = r.league_id AND tp.roster_id = r.roster_id
                     WHERE r.roster_id = ?1",
                    params![roster_id],
                    roster_match,
                )
                .optional()?;
            return Ok(found.map_or(Resolution::NotFound, Resolution::Resolved));
        }

        let mut stmt = self.conn.prepare(
            "SELECT roster_id, team_name, manager_name
             FROM team_profiles
             WHERE (team_name IS NOT NULL AND lower(team_name) = lower(?1))
                OR (manager_name IS NOT NULL AND lower(manager_name) = lower(?1))
             ORDER BY team_name, manager_name, roster_id",
        )?;
        let matches = stmt
            .query_map(params![key], roster_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(from_matches(matches))
    }
}
