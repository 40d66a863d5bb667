//! Unit tests for raw Sleeper payload contracts

use super::*;
use serde_json::json;

#[test]
fn test_roster_accepts_numeric_and_string_ids() {
    let roster: RawRoster = parse_one(
        "roster",
        &json!({
            "roster_id": "3",
            "owner_id": 7331,
            "players": ["4046", null, "", "BUF"],
            "starters": ["4046"],
            "taxi": null
        }),
    )
    .unwrap();

    assert_eq!(roster.roster_id, 3);
    assert_eq!(roster.owner_id.as_deref(), Some("7331"));
    assert_eq!(roster.players, vec!["4046", "BUF"]);
    assert!(roster.taxi.is_empty());
    assert!(roster.reserve.is_empty());
}

#[test]
fn test_roster_missing_id_is_normalize_error() {
    let result = parse_list::<RawRoster>("roster", &json!([{ "owner_id": "1" }]));
    match result {
        Err(SleeperError::Normalize { entity, message }) => {
            assert_eq!(entity, "roster");
            assert!(message.contains("roster_id"), "{}", message);
        }
        other => panic!("Expected Normalize error, got {:?}", other),
    }
}

#[test]
fn test_parse_list_null_is_empty() {
    let users: Vec<RawUser> = parse_list("user", &Value::Null).unwrap();
    assert!(users.is_empty());
}

#[test]
fn test_parse_list_rejects_object() {
    let result = parse_list::<RawUser>("user", &json!({"user_id": "1"}));
    assert!(matches!(result, Err(SleeperError::Normalize { .. })));
}

#[test]
fn test_matchup_defaults() {
    let row: RawMatchup = parse_one(
        "matchup",
        &json!({
            "roster_id": 1,
            "matchup_id": null,
            "points": null,
            "players_points": { "4046": 21.5, "BUF": "7", "6794": "n/a" }
        }),
    )
    .unwrap();

    assert_eq!(row.matchup_id, None);
    assert_eq!(row.points, 0.0);
    assert_eq!(row.players_points.get("4046"), Some(&21.5));
    assert_eq!(row.players_points.get("BUF"), Some(&7.0));
    assert!(!row.players_points.contains_key("6794"));
}

#[test]
fn test_league_settings_lenient() {
    let league: RawLeague = parse_one(
        "league",
        &json!({
            "league_id": "123",
            "season": "2024",
            "settings": {
                "playoff_week_start": "15",
                "league_average_match": 1,
                "draft_rounds": 4
            }
        }),
    )
    .unwrap();

    let settings = league.settings.unwrap();
    assert_eq!(settings.playoff_week_start, Some(15));
    assert!(settings.league_average_match);
    assert_eq!(settings.draft_rounds, Some(4));
    assert_eq!(settings.playoff_teams, None);
}

#[test]
fn test_transaction_bid_amount() {
    let tx: RawTransaction = parse_one(
        "transaction",
        &json!({
            "transaction_id": 99,
            "type": "waiver",
            "settings": { "waiver_bid": 17 },
            "adds": { "4046": 2 },
            "drops": null
        }),
    )
    .unwrap();

    assert_eq!(tx.transaction_id, "99");
    assert_eq!(tx.bid_amount(), Some(17));
    assert_eq!(tx.adds.get("4046"), Some(&Some(2)));
    assert!(tx.drops.is_empty());

    let fa: RawTransaction = parse_one(
        "transaction",
        &json!({ "transaction_id": "1", "settings": { "price": 5 } }),
    )
    .unwrap();
    assert_eq!(fa.bid_amount(), Some(5));

    let trade: RawTransaction =
        parse_one("transaction", &json!({ "transaction_id": "2" })).unwrap();
    assert_eq!(trade.bid_amount(), None);
}

#[test]
fn test_bracket_refs() {
    let node: RawBracketMatchup = parse_one(
        "bracket",
        &json!({
            "r": 2, "m": 5,
            "t1": null, "t2": 4,
            "t1_from": { "w": 1 },
            "t2_from": { "l": 2 },
            "p": 1
        }),
    )
    .unwrap();

    assert_eq!(node.t1, None);
    assert_eq!(node.t2, Some(4));
    assert_eq!(node.t1_from.unwrap().outcome(), Some((1, "w")));
    assert_eq!(node.t2_from.unwrap().outcome(), Some((2, "l")));
    assert_eq!(node.p, Some(1));
}

#[test]
fn test_roster_metadata_lookup() {
    let roster: RawRoster = parse_one(
        "roster",
        &json!({
            "roster_id": 1,
            "metadata": { "team_name": "", "name": "Team Taco" }
        }),
    )
    .unwrap();
    assert_eq!(
        roster.metadata_str(&["team_name", "name"]).as_deref(),
        Some("Team Taco")
    );
}
