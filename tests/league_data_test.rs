//! End-to-end tests: load a fixture league and query it through the facade

mod common;

use common::{config, loaded, FixtureSource};
use serde_json::{json, Value};
use sleeper_ffl::{
    storage::{schema::TABLES, BracketType},
    tools, Resolution, SleeperError, SleeperLeagueData, Week,
};

fn count(data: &SleeperLeagueData<FixtureSource>, sql: &str) -> i64 {
    let result = data.run_sql(sql, &[], None).unwrap();
    result["rows"][0][0].as_i64().unwrap()
}

#[tokio::test]
async fn test_queries_fail_before_load() {
    let data = SleeperLeagueData::new(config(None), FixtureSource::default());
    assert!(!data.is_loaded());
    assert!(matches!(data.get_week_games(None), Err(SleeperError::NotLoaded)));
    assert!(matches!(data.run_sql("SELECT 1", &[], None), Err(SleeperError::NotLoaded)));
}

#[tokio::test]
async fn test_week_games_for_current_week() {
    let data = loaded().await;
    assert_eq!(data.effective_week().unwrap(), Week::new(8));

    let games = data.get_week_games(None).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(
        serde_json::to_value(&games[0]).unwrap(),
        json!({
            "week": 8,
            "matchup_id": 1,
            "team_a": "Team Taco",
            "team_b": "The Waiver Wire",
            "points_a": 142.3,
            "points_b": 98.7,
            "winner": "Team Taco"
        })
    );

    // Nothing was played in earlier weeks
    assert!(data.get_week_games(Some(Week::new(3))).unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_player_is_a_structured_miss() {
    let data = loaded().await;
    assert_eq!(
        data.get_player_summary("nonexistent player").unwrap(),
        json!({ "found": false, "player_key": "nonexistent player" })
    );
}

#[tokio::test]
async fn test_shared_player_name_is_ambiguous() {
    let data = loaded().await;

    match data.resolve_player("Josh Allen").unwrap() {
        Resolution::Ambiguous(matches) => {
            let mut ids: Vec<&str> = matches.iter().map(|m| m.player_id.as_str()).collect();
            ids.sort();
            assert_eq!(ids, vec!["1234", "4984"]);
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }

    // An explicit id still resolves
    let summary = data.get_player_summary("4984").unwrap();
    assert_eq!(summary["found"], true);
    assert_eq!(summary["player"]["position"], "QB");
}

#[tokio::test]
async fn test_draft_picks_seeded_and_reconciled() {
    let data = loaded().await;

    // 2 rosters x 2 rounds x 3 seasons
    assert_eq!(count(&data, "SELECT COUNT(*) FROM draft_picks"), 12);
    assert_eq!(
        count(
            &data,
            "SELECT COUNT(*) FROM draft_picks WHERE current_roster_id != original_roster_id"
        ),
        2
    );
    assert_eq!(
        count(
            &data,
            "SELECT COUNT(*) FROM (SELECT season, round, original_roster_id FROM draft_picks \
             GROUP BY season, round, original_roster_id HAVING COUNT(*) > 1)"
        ),
        0
    );

    let owner = data
        .run_sql(
            "SELECT current_roster_id FROM draft_picks \
             WHERE season = ?1 AND round = ?2 AND original_roster_id = ?3",
            &[json!("2025"), json!(1), json!(1)],
            None,
        )
        .unwrap();
    assert_eq!(owner["rows"][0][0], 2);
}

#[tokio::test]
async fn test_standings_are_deterministic_across_loads() {
    let mut data = loaded().await;
    let first = data.get_standings(None).unwrap();
    data.load().await.unwrap();
    let second = data.get_standings(None).unwrap();

    assert_eq!(first, second);

    let standings = first["standings"].as_array().unwrap();
    assert_eq!(standings[0]["team_name"], "Team Taco");
    assert_eq!(standings[0]["record"], "1-0");
    assert_eq!(standings[0]["rank"], 1);
    assert_eq!(standings[0]["streak_type"], "W");
    assert_eq!(standings[1]["team_name"], "The Waiver Wire");
    assert_eq!(standings[1]["streak_type"], "L");
}

#[tokio::test]
async fn test_roster_resolution_is_total() {
    let data = loaded().await;
    for key in ["Team Taco", "team taco", "tacoman", "1", "wirebot"] {
        assert!(
            matches!(data.resolve_roster(key).unwrap(), Resolution::Resolved(_)),
            "{} should resolve",
            key
        );
    }
    for key in ["", "   ", "99", "Nobody"] {
        assert!(matches!(data.resolve_roster(key).unwrap(), Resolution::NotFound));
    }
}

#[tokio::test]
async fn test_week_override_caps_loaded_weeks() {
    let mut data = SleeperLeagueData::new(config(Some(5)), FixtureSource::default());
    data.load().await.unwrap();

    assert_eq!(data.effective_week().unwrap(), Week::new(5));
    assert_eq!(count(&data, "SELECT COUNT(*) FROM matchups WHERE week > 5"), 0);
    assert_eq!(count(&data, "SELECT COUNT(*) FROM games"), 0);
    assert_eq!(count(&data, "SELECT computed_week FROM season_context"), 8);
}

#[tokio::test]
async fn test_repeated_transactions_are_stored_once() {
    let data = loaded().await;
    assert_eq!(count(&data, "SELECT COUNT(*) FROM transactions"), 2);
    assert_eq!(
        count(&data, "SELECT week FROM transactions WHERE transaction_id = 'tx-claim'"),
        7
    );

    let history = data.get_team_transactions("Team Taco", None, None).unwrap();
    assert_eq!(history["found"], true);
    let transactions = history["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    // Newest first
    assert_eq!(transactions[0]["type"], "trade");
    assert_eq!(transactions[1]["bid_amount"], 15);
}

#[tokio::test]
async fn test_playoff_champion() {
    let data = loaded().await;

    let bracket = data.get_playoff_bracket(Some(BracketType::Winners)).unwrap();
    assert_eq!(bracket["found"], true);
    assert_eq!(bracket["brackets"]["winners"]["champion"], "Team Taco");

    let path = data.get_team_playoff_path("The Waiver Wire").unwrap();
    assert_eq!(path["is_eliminated"], true);
    assert_eq!(path["is_champion"], false);
}

#[tokio::test]
async fn test_export_writes_every_table() {
    let data = loaded().await;
    let dir = tempfile::tempdir().unwrap();
    let path = data.export(dir.path().join("league.db")).unwrap();

    let conn = rusqlite::Connection::open(&path).unwrap();
    for table in TABLES {
        let exported: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table.name), [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(
            exported as u64,
            data.database().unwrap().row_count(table.name).unwrap(),
            "row count mismatch in {}",
            table.name
        );
    }
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_store() {
    let mut data = loaded().await;
    data.source().fail_players.set(true);

    let err = data.load().await.unwrap_err();
    assert!(matches!(err, SleeperError::EmptyResponse { .. }));

    // Still answering from the first load
    assert!(data.is_loaded());
    assert_eq!(data.get_week_games(None).unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_required_field_aborts_reload() {
    let mut data = loaded().await;
    let before: Vec<u64> = TABLES
        .iter()
        .map(|t| data.database().unwrap().row_count(t.name).unwrap())
        .collect();
    data.source().malformed_matchup.set(true);

    let err = data.load().await.unwrap_err();
    match err {
        SleeperError::Normalize { entity, .. } => assert_eq!(entity, "matchup"),
        other => panic!("expected a normalize error, got {:?}", other),
    }

    let after: Vec<u64> = TABLES
        .iter()
        .map(|t| data.database().unwrap().row_count(t.name).unwrap())
        .collect();
    assert_eq!(before, after);
    assert_eq!(data.get_week_games(None).unwrap()[0].points_a, 142.3);
}

#[tokio::test]
async fn test_dispatch_over_loaded_league() {
    let data = loaded().await;

    let game = tools::dispatch(
        &data,
        "get_team_game",
        &json!({ "roster_key": "Team Taco", "week": 8 }),
    )
    .unwrap();
    assert_eq!(game["found"], true);
    assert_eq!(game["game"]["winner"], "Team Taco");

    let sql = tools::dispatch(
        &data,
        "run_sql",
        &json!({ "query": "SELECT team_name FROM team_profiles ORDER BY roster_id" }),
    )
    .unwrap();
    assert_eq!(sql["rows"], json!([["Team Taco"], ["The Waiver Wire"]]));

    let err = tools::dispatch(&data, "get_team_game", &Value::Null).unwrap_err();
    assert!(matches!(err, SleeperError::InvalidToolArguments { .. }));
}
