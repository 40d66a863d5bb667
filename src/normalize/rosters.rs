//! Roster, roster composition and team profile normalization

use crate::{
    sleeper::types::{RawRoster, RawUser},
    storage::{Roster, RosterPlayer, RosterRole, TeamProfile},
    LeagueId, PlayerId, RosterId,
};
use std::collections::{BTreeSet, HashMap, HashSet};

const AVATAR_BASE_URL: &str = "https://sleepercdn.com/avatars";

pub fn normalize_rosters(raw: &[RawRoster], league_id: &LeagueId) -> Vec<Roster> {
    raw.iter()
        .map(|r| Roster {
            league_id: league_id.clone(),
            roster_id: RosterId::new(r.roster_id),
            owner_user_id: r.owner_id.clone(),
            settings_json: r.settings.as_ref().map(|v| v.to_string()),
            metadata_json: r.metadata.as_ref().map(|v| v.to_string()),
            record_string: r.metadata_str(&["record"]),
        })
        .collect()
}

fn role_for(roster: &RawRoster, player_id: &str) -> RosterRole {
    let listed = |ids: &[String]| ids.iter().any(|id| id == player_id);
    if listed(&roster.starters) {
        RosterRole::Starter
    } else if listed(&roster.taxi) {
        RosterRole::Taxi
    } else if listed(&roster.reserve) {
        RosterRole::Reserve
    } else if listed(&roster.ir) {
        RosterRole::Ir
    } else {
        RosterRole::Bench
    }
}

/// Current roster composition.
///
/// Every id in `players` is emitted in source order; ids that only appear in
/// the starters/taxi/reserve/ir lists follow in sorted order.
pub fn normalize_roster_players(raw: &[RawRoster], league_id: &LeagueId) -> Vec<RosterPlayer> {
    let mut rows = Vec::new();

    for roster in raw {
        let mut seen: HashSet<&str> = HashSet::new();
        let push = |player_id: &str, rows: &mut Vec<RosterPlayer>| {
            rows.push(RosterPlayer {
                league_id: league_id.clone(),
                roster_id: RosterId::new(roster.roster_id),
                player_id: PlayerId::new(player_id),
                role: role_for(roster, player_id),
            });
        };

        for player_id in &roster.players {
            if seen.insert(player_id.as_str()) {
                push(player_id, &mut rows);
            }
        }

        let extras: BTreeSet<&str> = roster
            .starters
            .iter()
            .chain(&roster.taxi)
            .chain(&roster.reserve)
            .chain(&roster.ir)
            .map(String::as_str)
            .filter(|id| !seen.contains(id))
            .collect();
        for player_id in extras {
            push(player_id, &mut rows);
        }
    }

    rows
}

/// Display identity for each roster.
///
/// Team name comes from roster metadata (`team_name`, then `name`, then
/// `team_name2`), falling back to the owner's display name; the manager is
/// the owner's display name, falling back to their username.
pub fn derive_team_profiles(
    rosters: &[RawRoster],
    users: &[RawUser],
    league_id: &LeagueId,
) -> Vec<TeamProfile> {
    let users_by_id: HashMap<&str, &RawUser> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    rosters
        .iter()
        .map(|roster| {
            let owner = roster
                .owner_id
                .as_deref()
                .and_then(|id| users_by_id.get(id).copied());

            let manager_name =
                owner.and_then(|u| u.display_name.clone().or_else(|| u.username.clone()));
            let team_name = roster
                .metadata_str(&["team_name", "name", "team_name2"])
                .or_else(|| manager_name.clone());
            let avatar = owner
                .and_then(|u| u.avatar.clone())
                .or_else(|| roster.metadata_str(&["avatar"]));

            TeamProfile {
                league_id: league_id.clone(),
                roster_id: RosterId::new(roster.roster_id),
                team_name,
                manager_name,
                avatar_url: avatar.map(|id| format!("{}/{}", AVATAR_BASE_URL, id)),
            }
        })
        .collect()
}
