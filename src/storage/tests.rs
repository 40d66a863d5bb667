//! Unit tests for storage functionality

use super::*;
use crate::cli::types::{LeagueId, PlayerId, RosterId, Season, Week};
use tempfile::tempdir;

fn test_league() -> League {
    League {
        league_id: LeagueId::new("L1"),
        season: Season::new(2024),
        name: "Test League".to_string(),
        sport: "nfl".to_string(),
        scoring_settings_json: None,
        roster_positions_json: None,
        playoff_week_start: Some(Week::new(15)),
        playoff_teams: Some(4),
        league_average_match: false,
        draft_rounds: 3,
    }
}

fn test_roster(id: u32) -> Roster {
    Roster {
        league_id: LeagueId::new("L1"),
        roster_id: RosterId::new(id),
        owner_user_id: None,
        settings_json: None,
        metadata_json: None,
        record_string: None,
    }
}

fn create_test_db_with_rosters() -> LeagueDatabase {
    let mut db = LeagueDatabase::open_in_memory().unwrap();
    db.bulk_insert(&[test_league()]).unwrap();
    db.bulk_insert(&[test_roster(1), test_roster(2)]).unwrap();
    db
}

#[test]
fn test_database_creation() {
    let db = LeagueDatabase::open_in_memory().unwrap();
    for table in schema::TABLES {
        assert_eq!(db.row_count(table.name).unwrap(), 0, "{}", table.name);
    }
}

#[test]
fn test_create_tables_is_idempotent() {
    let db = LeagueDatabase::open_in_memory().unwrap();
    assert!(db.create_tables().is_ok());
}

#[test]
fn test_create_table_sql_shape() {
    let sql = schema::GAMES.create_table_sql();
    assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS games ("));
    assert!(sql.contains("winner_roster_id INTEGER,"));
    assert!(sql.contains("points_a REAL NOT NULL"));
    assert!(sql.contains("PRIMARY KEY (league_id, week, matchup_id)"));
    assert!(sql.contains(
        "FOREIGN KEY (league_id, roster_id_a) REFERENCES rosters (league_id, roster_id)"
    ));
}

#[test]
fn test_registry_has_fifteen_tables() {
    assert_eq!(schema::TABLES.len(), 15);
    assert!(schema::table("standings").is_some());
    assert!(schema::table("nope").is_none());
}

#[test]
fn test_record_values_match_column_count() {
    let league = test_league();
    assert_eq!(league.values().len(), League::TABLE.columns.len());

    let roster = test_roster(1);
    assert_eq!(roster.values().len(), Roster::TABLE.columns.len());

    let game = Game {
        league_id: LeagueId::new("L1"),
        season: Season::new(2024),
        week: Week::new(1),
        matchup_id: 1,
        roster_id_a: RosterId::new(1),
        roster_id_b: RosterId::new(2),
        points_a: 100.0,
        points_b: 90.0,
        winner_roster_id: Some(RosterId::new(1)),
        is_playoffs: false,
    };
    assert_eq!(game.values().len(), Game::TABLE.columns.len());

    let mv = TransactionMove {
        transaction_id: "t1".to_string(),
        roster_id: Some(RosterId::new(1)),
        player_id: Some(PlayerId::new("4046")),
        asset_type: AssetType::Player,
        direction: MoveDirection::Add,
        bid_amount: Some(12),
        from_roster_id: None,
        to_roster_id: None,
        pick_season: None,
        pick_round: None,
        pick_original_roster_id: None,
        pick_id: None,
    };
    assert_eq!(mv.values().len(), TransactionMove::TABLE.columns.len());
}

#[test]
fn test_bulk_insert_counts_rows() {
    let db = create_test_db_with_rosters();
    assert_eq!(db.row_count("leagues").unwrap(), 1);
    assert_eq!(db.row_count("rosters").unwrap(), 2);
}

#[test]
fn test_bulk_insert_empty_is_noop() {
    let mut db = LeagueDatabase::open_in_memory().unwrap();
    let rows: Vec<Game> = Vec::new();
    assert_eq!(db.bulk_insert(&rows).unwrap(), 0);
}

#[test]
fn test_bulk_insert_rolls_back_on_duplicate_key() {
    let mut db = create_test_db_with_rosters();
    let result = db.bulk_insert(&[test_roster(3), test_roster(3)]);
    assert!(result.is_err());
    // The whole batch is discarded
    assert_eq!(db.row_count("rosters").unwrap(), 2);
}

#[test]
fn test_foreign_keys_enforced() {
    let mut db = LeagueDatabase::open_in_memory().unwrap();
    let result = db.bulk_insert(&[test_roster(1)]);
    assert!(result.is_err());
}

#[test]
fn test_effective_week_before_and_after_context() {
    let mut db = create_test_db_with_rosters();
    assert_eq!(db.effective_week().unwrap(), None);

    db.bulk_insert(&[SeasonContext {
        league_id: LeagueId::new("L1"),
        computed_week: Week::new(10),
        override_week: Some(Week::new(8)),
        effective_week: Week::new(8),
        generated_at: "2024-11-01T00:00:00+00:00".to_string(),
    }])
    .unwrap();
    assert_eq!(db.effective_week().unwrap(), Some(8));
}

#[test]
fn test_export_writes_readable_file() {
    let db = create_test_db_with_rosters();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("league.db");

    let written = db.export(&path).unwrap();
    assert_eq!(written, path);

    let conn = rusqlite::Connection::open(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM rosters", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_row_count_unknown_table() {
    let db = LeagueDatabase::open_in_memory().unwrap();
    assert!(db.row_count("sqlite_master; DROP TABLE games").is_err());
}
