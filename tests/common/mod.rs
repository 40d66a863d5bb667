//! In-memory league fixture shared by the integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use sleeper_ffl::{
    LeagueId, LeagueSource, Result, SleeperConfig, SleeperError, SleeperLeagueData, Week,
};
use std::cell::Cell;

/// Two-team league: Team Taco beats The Waiver Wire 142.3-98.7 in week 8.
pub struct FixtureSource {
    pub current_week: u16,
    /// Make the player fetch fail, to exercise aborted loads
    pub fail_players: Cell<bool>,
    /// Serve a week 8 matchup row without its required `roster_id`
    pub malformed_matchup: Cell<bool>,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self {
            current_week: 8,
            fail_players: Cell::new(false),
            malformed_matchup: Cell::new(false),
        }
    }
}

impl LeagueSource for FixtureSource {
    async fn league(&self) -> Result<Value> {
        Ok(json!({
            "league_id": "L1",
            "name": "Taco Tuesday League",
            "season": "2024",
            "sport": "nfl",
            "settings": {
                "playoff_week_start": 15,
                "playoff_teams": 2,
                "league_average_match": 0,
                "draft_rounds": 2
            },
            "scoring_settings": { "rec": 1.0 },
            "roster_positions": ["QB", "RB", "WR", "TE", "FLEX", "K", "DEF", "BN"]
        }))
    }

    async fn users(&self) -> Result<Value> {
        Ok(json!([
            { "user_id": "u1", "display_name": "tacoman", "avatar": "abc123" },
            { "user_id": "u2", "display_name": "wirebot" }
        ]))
    }

    async fn rosters(&self) -> Result<Value> {
        Ok(json!([
            {
                "roster_id": 1,
                "owner_id": "u1",
                "players": ["4984", "6794"],
                "starters": ["4984"],
                "metadata": { "team_name": "Team Taco" },
                "settings": { "wins": 1, "losses": 0 }
            },
            {
                "roster_id": 2,
                "owner_id": "u2",
                "players": ["1234"],
                "starters": ["1234"],
                "metadata": { "team_name": "The Waiver Wire" }
            }
        ]))
    }

    async fn matchups(&self, week: Week) -> Result<Value> {
        if week.as_u16() != 8 {
            return Ok(json!([]));
        }
        if self.malformed_matchup.get() {
            return Ok(json!([
                { "matchup_id": 1, "points": 142.3 },
                { "roster_id": 2, "matchup_id": 1, "points": 98.7 }
            ]));
        }
        Ok(json!([
            {
                "roster_id": 1,
                "matchup_id": 1,
                "points": 142.3,
                "starters": ["4984"],
                "players": ["4984", "6794"],
                "players_points": { "4984": 31.4, "6794": 12.0 }
            },
            {
                "roster_id": 2,
                "matchup_id": 1,
                "points": 98.7,
                "starters": ["1234"],
                "players": ["1234"],
                "players_points": { "1234": 8.5 }
            }
        ]))
    }

    async fn transactions(&self, week: Week) -> Result<Value> {
        let claim = json!({
            "transaction_id": "tx-claim",
            "type": "waiver",
            "status": "complete",
            "created": 1_729_000_000_000_i64,
            "roster_ids": [1],
            "adds": { "6794": 1 },
            "drops": null,
            "settings": { "waiver_bid": 15 }
        });
        match week.as_u16() {
            7 => Ok(json!([claim])),
            // Sleeper repeats the claim in the following week's feed
            8 => Ok(json!([
                claim,
                {
                    "transaction_id": "tx-trade",
                    "type": "trade",
                    "status": "complete",
                    "created": 1_729_600_000_000_i64,
                    "roster_ids": [1, 2],
                    "adds": null,
                    "drops": null,
                    "draft_picks": [{
                        "season": "2025",
                        "round": 1,
                        "roster_id": 1,
                        "owner_id": 2,
                        "previous_owner_id": 1
                    }]
                }
            ])),
            _ => Ok(json!([])),
        }
    }

    async fn traded_picks(&self) -> Result<Value> {
        Ok(json!([
            { "season": "2025", "round": 1, "roster_id": 1, "owner_id": 2, "previous_owner_id": 1 },
            { "season": "2026", "round": 2, "roster_id": 2, "owner_id": 1, "previous_owner_id": 2 },
            // Outside the seeded seasons
            { "season": "2031", "round": 1, "roster_id": 1, "owner_id": 2, "previous_owner_id": 1 }
        ]))
    }

    async fn players(&self) -> Result<Value> {
        if self.fail_players.get() {
            return Err(SleeperError::EmptyResponse {
                url: "fixture://players/nfl".to_string(),
            });
        }
        Ok(json!({
            "4984": {
                "player_id": "4984", "full_name": "Josh Allen", "position": "QB",
                "team": "BUF", "status": "Active", "age": 28, "years_exp": 6
            },
            "1234": {
                "player_id": "1234", "first_name": "Josh", "last_name": "Allen",
                "position": "LB", "team": "JAX", "status": "Active", "injury_status": "Questionable"
            },
            "6794": {
                "player_id": "6794", "full_name": "Justin Jefferson", "position": "WR",
                "team": "MIN", "status": "Active", "age": 25
            }
        }))
    }

    async fn state(&self) -> Result<Value> {
        Ok(json!({ "week": self.current_week, "season": "2024", "season_type": "regular" }))
    }

    async fn winners_bracket(&self) -> Result<Value> {
        Ok(json!([
            { "r": 1, "m": 1, "t1": 1, "t2": 2, "w": 1, "l": 2, "p": 1 }
        ]))
    }

    async fn losers_bracket(&self) -> Result<Value> {
        Ok(json!([]))
    }
}

pub fn config(week_override: Option<u16>) -> SleeperConfig {
    SleeperConfig::new(LeagueId::new("L1"), week_override.map(Week::new))
}

pub async fn loaded() -> SleeperLeagueData<FixtureSource> {
    let mut data = SleeperLeagueData::new(config(None), FixtureSource::default());
    data.load().await.unwrap();
    data
}
