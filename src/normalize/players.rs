//! NFL player dictionary normalization

use crate::{
    error::{Result, SleeperError},
    sleeper::types::{json_kind, parse_one, RawPlayer},
    storage::Player,
    PlayerId,
};
use rayon::prelude::*;
use serde_json::Value;

/// `full_name`, else "first last" when both parts are present.
pub fn player_display_name(raw: &RawPlayer) -> Option<String> {
    if let Some(name) = &raw.full_name {
        return Some(name.clone());
    }
    match (&raw.first_name, &raw.last_name) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        _ => None,
    }
}

/// Normalize the `{player_id: {...}}` dictionary, sorted by player id.
///
/// The dictionary holds every NFL player (several thousand entries), so
/// entries are validated in parallel.
pub fn normalize_players(raw: &Value) -> Result<Vec<Player>> {
    let map = match raw {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(SleeperError::normalize(
                "player",
                format!("expected an object keyed by player id, got {}", json_kind(other)),
            ))
        }
    };

    let entries: Vec<(&String, &Value)> = map.iter().collect();
    let mut players = entries
        .par_iter()
        .map(|(key, value)| -> Result<Player> {
            let player: RawPlayer = parse_one("player", value)?;
            Ok(Player {
                player_id: PlayerId::new(
                    player.player_id.clone().unwrap_or_else(|| (*key).clone()),
                ),
                full_name: player_display_name(&player),
                position: player.position.clone(),
                nfl_team: player.team.clone(),
                status: player.status.clone(),
                injury_status: player.injury_status.clone(),
                age: player.age,
                years_exp: player.years_exp,
                metadata_json: Some(value.to_string()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    players.sort_by(|a, b| a.player_id.cmp(&b.player_id));
    players.dedup_by(|a, b| a.player_id == b.player_id);
    Ok(players)
}
