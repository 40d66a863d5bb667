//! ID types for Sleeper leagues, rosters and players.

use crate::error::{Result, SleeperError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for Sleeper league IDs.
///
/// Sleeper issues league IDs as long numeric strings (snowflakes), so the
/// value is kept as text rather than parsed into an integer.
///
/// # Examples
///
/// ```rust
/// use sleeper_ffl::LeagueId;
///
/// let league_id: LeagueId = "1048313545995296768".parse().unwrap();
/// assert_eq!(league_id.as_str(), "1048313545995296768");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeagueId(pub String);

impl LeagueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LeagueId {
    type Err = SleeperError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SleeperError::MissingLeagueId {
                env_var: crate::LEAGUE_ID_ENV_VAR.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Roster slot within a league (1-based, unique per league)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RosterId(pub u32);

impl RosterId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RosterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RosterId {
    type Err = SleeperError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Type-safe wrapper for Sleeper player IDs.
///
/// Most players carry numeric IDs ("4046"); team defenses use the team
/// abbreviation ("BUF").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `key` has the shape of a numeric Sleeper player ID.
    pub fn looks_like_id(key: &str) -> bool {
        !key.is_empty() && key.chars().all(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
