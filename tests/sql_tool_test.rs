//! The SQL tool must never change the loaded store

mod common;

use common::loaded;
use serde_json::json;
use sleeper_ffl::{queries::DEFAULT_SQL_LIMIT, storage::schema::TABLES, SleeperError};
use std::collections::BTreeMap;

#[tokio::test]
async fn test_mutations_are_rejected_and_store_unchanged() {
    let data = loaded().await;
    let db = data.database().unwrap();
    let before: BTreeMap<&str, u64> = TABLES
        .iter()
        .map(|t| (t.name, db.row_count(t.name).unwrap()))
        .collect();

    let attempts = [
        "DELETE FROM players",
        "DROP TABLE games",
        "UPDATE rosters SET owner_id = NULL",
        "INSERT INTO users (user_id) VALUES ('x')",
        "SELECT 1; DELETE FROM players",
        "WITH gone AS (SELECT 1) DELETE FROM players",
        "PRAGMA writable_schema = 1",
        "ATTACH DATABASE ':memory:' AS other",
        "  select * from players where player_id in \
         (select player_id from players); drop table players",
    ];
    for sql in attempts {
        let err = data.run_sql(sql, &[], None).unwrap_err();
        assert!(
            matches!(err, SleeperError::SqlRejected { .. }),
            "{} was not rejected: {:?}",
            sql,
            err
        );
    }

    let after: BTreeMap<&str, u64> = TABLES
        .iter()
        .map(|t| (t.name, db.row_count(t.name).unwrap()))
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_select_preserves_column_order_and_limits() {
    let data = loaded().await;

    let result = data
        .run_sql(
            "SELECT team_name, roster_id FROM team_profiles ORDER BY roster_id;",
            &[],
            None,
        )
        .unwrap();
    assert_eq!(result["columns"], json!(["team_name", "roster_id"]));
    assert_eq!(result["row_count"], 2);
    assert_eq!(result["rows"][1], json!(["The Waiver Wire", 2]));

    let limited = data
        .run_sql("SELECT player_id FROM players ORDER BY player_id", &[], Some(1))
        .unwrap();
    assert_eq!(limited["rows"], json!([["1234"]]));

    // Default cap still leaves room for the whole fixture
    let all = data.run_sql("SELECT * FROM draft_picks", &[], None).unwrap();
    assert!(all["row_count"].as_u64().unwrap() <= u64::from(DEFAULT_SQL_LIMIT));
    assert_eq!(all["row_count"], 12);
}

#[tokio::test]
async fn test_row_cap_ignores_limit_words_elsewhere_in_query() {
    let data = loaded().await;
    // 12 x 12 picks
    let cross = "SELECT a.season FROM draft_picks a, draft_picks b";

    for sql in [
        format!("{}, (SELECT 1 LIMIT 1)", cross),
        format!("{} WHERE a.source != 'limit'", cross),
        format!("{} LIMIT 1000000", cross),
    ] {
        let result = data.run_sql(&sql, &[], Some(5)).unwrap();
        assert_eq!(result["row_count"], 5, "{}", sql);
        assert_eq!(result["rows"].as_array().unwrap().len(), 5);
    }

    let uncapped = data.run_sql(cross, &[], Some(500)).unwrap();
    assert_eq!(uncapped["row_count"], 144);
}
