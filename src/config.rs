//! Runtime configuration: which league to load and an optional week override.

use crate::{
    error::{Result, SleeperError},
    LeagueId, Week, LEAGUE_ID_ENV_VAR, WEEK_OVERRIDE_ENV_VAR,
};

/// Base path for the Sleeper v1 read API.
pub const SLEEPER_BASE_URL: &str = "https://api.sleeper.app/v1";

/// Request timeout applied to every source fetch.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleeperConfig {
    pub league_id: LeagueId,
    pub week_override: Option<Week>,
}

impl SleeperConfig {
    pub fn new(league_id: LeagueId, week_override: Option<Week>) -> Self {
        Self {
            league_id,
            week_override,
        }
    }

    /// Read `SLEEPER_LEAGUE_ID` and `SLEEPER_WEEK_OVERRIDE` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// An empty override is treated as unset; anything else must parse as a week number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let league_id = lookup(LEAGUE_ID_ENV_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SleeperError::MissingLeagueId {
                env_var: LEAGUE_ID_ENV_VAR.to_string(),
            })?
            .parse()?;

        let week_override = match lookup(WEEK_OVERRIDE_ENV_VAR) {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(
                raw.parse::<Week>()
                    .map_err(|_| SleeperError::InvalidWeekOverride { value: raw.clone() })?,
            ),
        };

        Ok(Self {
            league_id,
            week_override,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn resolve(league_id: Option<LeagueId>, week: Option<Week>) -> Result<Self> {
        let base = match league_id {
            Some(id) => Self::from_lookup(|name| {
                if name == LEAGUE_ID_ENV_VAR {
                    Some(id.to_string())
                } else {
                    std::env::var(name).ok()
                }
            })?,
            None => Self::from_env()?,
        };
        Ok(Self {
            week_override: week.or(base.week_override),
            ..base
        })
    }
}
