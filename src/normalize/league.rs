//! League and user normalization

use crate::{
    error::{Result, SleeperError},
    sleeper::types::{RawLeague, RawState, RawUser},
    storage::{League, SeasonContext, User},
    LeagueId, Season, Week,
};
use chrono::{SecondsFormat, Utc};

pub fn normalize_league(raw: &RawLeague) -> Result<League> {
    let season: Season = raw
        .season
        .as_deref()
        .ok_or_else(|| SleeperError::normalize("league", "missing field `season`"))?
        .parse()
        .map_err(|e| SleeperError::normalize("league", format!("invalid season: {}", e)))?;

    let settings = raw.settings.clone().unwrap_or_default();

    Ok(League {
        league_id: LeagueId::new(raw.league_id.clone()),
        season,
        name: raw.name.clone().unwrap_or_default(),
        sport: raw.sport.clone().unwrap_or_else(|| "nfl".to_string()),
        scoring_settings_json: raw.scoring_settings.as_ref().map(|v| v.to_string()),
        roster_positions_json: raw.roster_positions.as_ref().map(|v| v.to_string()),
        playoff_week_start: settings.playoff_week_start.map(Week::new),
        playoff_teams: settings.playoff_teams,
        league_average_match: settings.league_average_match,
        draft_rounds: settings.draft_rounds.unwrap_or(0),
    })
}

/// Display name falls back to the username, then to an empty string.
pub fn normalize_users(raw: &[RawUser]) -> Vec<User> {
    raw.iter()
        .map(|u| User {
            user_id: u.user_id.clone(),
            display_name: u
                .display_name
                .clone()
                .or_else(|| u.username.clone())
                .unwrap_or_default(),
            username: u.username.clone(),
            avatar: u.avatar.clone(),
            metadata_json: u.metadata.as_ref().map(|v| v.to_string()),
        })
        .collect()
}

/// The week queries default to: the override when set, else the source's
/// current week (0 before the season starts).
pub fn season_context(
    league_id: &LeagueId,
    state: &RawState,
    override_week: Option<Week>,
) -> SeasonContext {
    let computed_week = Week::new(state.week.unwrap_or(0));
    SeasonContext {
        league_id: league_id.clone(),
        computed_week,
        override_week,
        effective_week: override_week.unwrap_or(computed_week),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}
