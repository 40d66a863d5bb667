//! League facade: owns the loaded store and answers queries against it
//!
//! `load()` fetches every payload from a [`LeagueSource`], normalizes it and
//! assembles a fresh in-memory database. The new database replaces the old
//! one only once every stage has succeeded, so a failed reload never leaves
//! a half-built store behind. Week-scoped queries default to the effective
//! week recorded by the last load.

use crate::{
    config::SleeperConfig,
    error::{Result, SleeperError},
    normalize,
    queries::{
        output::{GameWithPlayers, LeaderboardEntry, TransactionSummary, WeekGame},
        PlayerMatch, Resolution, RosterMatch, DEFAULT_SQL_LIMIT,
    },
    sleeper::{
        types::{
            parse_list, parse_one, RawBracketMatchup, RawDraftPick, RawLeague, RawMatchup,
            RawRoster, RawState, RawTransaction, RawUser,
        },
        LeagueSource,
    },
    storage::{BracketType, LeagueDatabase},
    RosterId, Week,
};
use serde_json::Value;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Leaderboard length when the caller does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;

pub struct SleeperLeagueData<S> {
    config: SleeperConfig,
    source: S,
    db: Option<LeagueDatabase>,
}

impl<S: LeagueSource> SleeperLeagueData<S> {
    /// Fetch, normalize and store the whole league.
    ///
    /// Re-running rebuilds the store from scratch. On failure the previously
    /// loaded store, if any, stays in place.
    pub async fn load(&mut self) -> Result<()> {
        info!(league_id = %self.config.league_id, "Loading league");
        let db = self.build().await?;
        self.db = Some(db);
        info!(league_id = %self.config.league_id, "League loaded");
        Ok(())
    }

    async fn build(&self) -> Result<LeagueDatabase> {
        let mut db = LeagueDatabase::open_in_memory()?;

        // League
        let raw_league: RawLeague = parse_one("league", &self.source.league().await?)?;
        let league = normalize::normalize_league(&raw_league)?;
        let league_id = league.league_id.clone();
        let season = league.season;
        let playoff_week_start = league.playoff_week_start;
        let draft_rounds = league.draft_rounds;
        db.bulk_insert(std::slice::from_ref(&league))?;
        info!(stage = "league", name = %league.name, season = %season, "Stage complete");

        // Users, rosters and team identity
        let raw_users: Vec<RawUser> = parse_list("user", &self.source.users().await?)?;
        let raw_rosters: Vec<RawRoster> = parse_list("roster", &self.source.rosters().await?)?;
        let users = normalize::normalize_users(&raw_users);
        let rosters = normalize::normalize_rosters(&raw_rosters, &league_id);
        let roster_players = normalize::normalize_roster_players(&raw_rosters, &league_id);
        let profiles = normalize::derive_team_profiles(&raw_rosters, &raw_users, &league_id);
        db.bulk_insert(&users)?;
        db.bulk_insert(&rosters)?;
        db.bulk_insert(&roster_players)?;
        db.bulk_insert(&profiles)?;
        info!(
            stage = "rosters",
            users = users.len(),
            rosters = rosters.len(),
            roster_players = roster_players.len(),
            "Stage complete"
        );

        // Draft picks: seed, then apply the traded-picks feed
        let mut picks = normalize::seed_draft_picks(&rosters, &league_id, season, draft_rounds);
        let traded: Vec<RawDraftPick> =
            parse_list("traded_pick", &self.source.traded_picks().await?)?;
        let applied = normalize::apply_traded_picks(&mut picks, &traded);
        db.bulk_insert(&picks)?;
        info!(
            stage = "draft_picks",
            seeded = picks.len(),
            traded = applied,
            "Stage complete"
        );

        // Players
        let players = normalize::normalize_players(&self.source.players().await?)?;
        db.bulk_insert(&players)?;
        info!(stage = "players", players = players.len(), "Stage complete");

        // Season context decides how many weeks to load
        let state: RawState = parse_one("state", &self.source.state().await?)?;
        let context = normalize::season_context(&league_id, &state, self.config.week_override);
        let effective_week = context.effective_week;
        debug!(
            computed = %context.computed_week,
            effective = %effective_week,
            "Resolved effective week"
        );

        // Per-week matchups and transactions
        let mut games = Vec::new();
        let mut seen_transactions = HashSet::new();
        for w in 1..=effective_week.as_u16() {
            let week = Week::new(w);

            let raw_matchups: Vec<RawMatchup> =
                parse_list("matchup", &self.source.matchups(week).await?)?;
            let (rows, performances) =
                normalize::normalize_matchups(&raw_matchups, &league_id, season, week);
            let week_games = normalize::derive_games(&rows, playoff_week_start);
            db.bulk_insert(&rows)?;
            db.bulk_insert(&performances)?;
            db.bulk_insert(&week_games)?;

            let raw_transactions: Vec<RawTransaction> =
                parse_list("transaction", &self.source.transactions(week).await?)?;
            let raw_transactions =
                normalize::dedupe_transactions(raw_transactions, &mut seen_transactions, week);
            let transactions =
                normalize::normalize_transactions(&raw_transactions, &league_id, season, week);
            let moves = normalize::normalize_transaction_moves(&raw_transactions);
            db.bulk_insert(&transactions)?;
            db.bulk_insert(&moves)?;

            info!(
                stage = "week",
                week = w,
                matchups = rows.len(),
                games = week_games.len(),
                performances = performances.len(),
                transactions = transactions.len(),
                "Stage complete"
            );
            games.extend(week_games);
        }

        // Standings
        let roster_ids: Vec<RosterId> = rosters.iter().map(|r| r.roster_id).collect();
        let standings =
            normalize::derive_standings(&games, &roster_ids, &league_id, season, effective_week);
        db.bulk_insert(&standings)?;
        info!(stage = "standings", rows = standings.len(), "Stage complete");

        // Playoff brackets
        let winners: Vec<RawBracketMatchup> =
            parse_list("winners_bracket", &self.source.winners_bracket().await?)?;
        let losers: Vec<RawBracketMatchup> =
            parse_list("losers_bracket", &self.source.losers_bracket().await?)?;
        let mut bracket =
            normalize::normalize_bracket(&winners, &league_id, season, BracketType::Winners);
        bracket.extend(normalize::normalize_bracket(
            &losers,
            &league_id,
            season,
            BracketType::Losers,
        ));
        db.bulk_insert(&bracket)?;
        info!(stage = "playoffs", matchups = bracket.len(), "Stage complete");

        db.bulk_insert(std::slice::from_ref(&context))?;
        info!(stage = "season_context", effective_week = %effective_week, "Stage complete");

        Ok(db)
    }
}

impl<S> SleeperLeagueData<S> {
    pub fn new(config: SleeperConfig, source: S) -> Self {
        Self {
            config,
            source,
            db: None,
        }
    }

    pub fn config(&self) -> &SleeperConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.db.is_some()
    }

    /// The loaded store, or `NotLoaded` before the first successful `load()`.
    pub fn database(&self) -> Result<&LeagueDatabase> {
        self.db.as_ref().ok_or(SleeperError::NotLoaded)
    }

    /// Write the loaded store to a single SQLite file.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.database()?.export(path)?;
        info!(path = %path.display(), "Exported league database");
        Ok(path)
    }

    /// The week week-scoped queries use by default.
    pub fn effective_week(&self) -> Result<Week> {
        Ok(self
            .database()?
            .effective_week()?
            .map(Week::new)
            .unwrap_or_default())
    }

    fn week_or_default(&self, week: Option<Week>) -> Result<Week> {
        match week {
            Some(week) => Ok(week),
            None => self.effective_week(),
        }
    }

    pub fn resolve_player(&self, key: &str) -> Result<Resolution<PlayerMatch>> {
        self.database()?.resolve_player_id(key)
    }

    pub fn resolve_roster(&self, key: &str) -> Result<Resolution<RosterMatch>> {
        self.database()?.resolve_roster_id(key)
    }

    pub fn get_league_snapshot(&self, week: Option<Week>) -> Result<Value> {
        let week = self.week_or_default(week)?;
        self.database()?.get_league_snapshot(week)
    }

    pub fn get_standings(&self, week: Option<Week>) -> Result<Value> {
        let week = self.week_or_default(week)?;
        self.database()?.get_standings(week)
    }

    pub fn get_week_games(&self, week: Option<Week>) -> Result<Vec<WeekGame>> {
        let week = self.week_or_default(week)?;
        self.database()?.get_week_games(week)
    }

    pub fn get_week_games_with_players(&self, week: Option<Week>) -> Result<Vec<GameWithPlayers>> {
        let week = self.week_or_default(week)?;
        self.database()?.get_week_games_with_players(week)
    }

    pub fn get_team_game(&self, roster_key: &str, week: Option<Week>) -> Result<Value> {
        let week = self.week_or_default(week)?;
        self.database()?.get_team_game(roster_key, week)
    }

    pub fn get_team_game_with_players(
        &self,
        roster_key: &str,
        week: Option<Week>,
    ) -> Result<Value> {
        let week = self.week_or_default(week)?;
        self.database()?.get_team_game_with_players(roster_key, week)
    }

    pub fn get_week_player_leaderboard(
        &self,
        week: Option<Week>,
        limit: Option<u32>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let week = self.week_or_default(week)?;
        self.database()?
            .get_week_player_leaderboard(week, limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT))
    }

    pub fn get_bench_analysis(
        &self,
        roster_key: Option<&str>,
        week: Option<Week>,
    ) -> Result<Value> {
        let week = self.week_or_default(week)?;
        self.database()?.get_bench_analysis(roster_key, week)
    }

    pub fn get_team_dossier(&self, roster_key: &str, week: Option<Week>) -> Result<Value> {
        let week = self.week_or_default(week)?;
        self.database()?.get_team_dossier(roster_key, week)
    }

    pub fn get_team_schedule(&self, roster_key: &str) -> Result<Value> {
        let week = self.effective_week()?;
        self.database()?.get_team_schedule(roster_key, week)
    }

    pub fn get_roster_current(&self, roster_key: &str) -> Result<Value> {
        self.database()?.get_roster_current(roster_key)
    }

    pub fn get_roster_snapshot(&self, roster_key: &str, week: Option<Week>) -> Result<Value> {
        let week = self.week_or_default(week)?;
        self.database()?.get_roster_snapshot(roster_key, week)
    }

    pub fn get_player_summary(&self, player_key: &str) -> Result<Value> {
        let week = self.effective_week()?;
        self.database()?.get_player_summary(player_key, week)
    }

    pub fn get_player_weekly_log(
        &self,
        player_key: &str,
        week_from: Option<Week>,
        week_to: Option<Week>,
    ) -> Result<Value> {
        self.database()?
            .get_player_weekly_log(player_key, week_from, week_to)
    }

    /// Transactions between two weeks, inclusive; defaults span week 1
    /// through the effective week.
    pub fn get_transactions(
        &self,
        week_from: Option<Week>,
        week_to: Option<Week>,
    ) -> Result<Vec<TransactionSummary>> {
        let week_to = self.week_or_default(week_to)?;
        let week_from = week_from.unwrap_or_default();
        self.database()?.get_transactions(week_from, week_to)
    }

    pub fn get_week_transactions(&self, week: Option<Week>) -> Result<Vec<TransactionSummary>> {
        let week = self.week_or_default(week)?;
        self.database()?.get_transactions(week, week)
    }

    pub fn get_team_transactions(
        &self,
        roster_key: &str,
        week_from: Option<Week>,
        week_to: Option<Week>,
    ) -> Result<Value> {
        let week_to = self.week_or_default(week_to)?;
        let week_from = week_from.unwrap_or_default();
        self.database()?
            .get_team_transactions(roster_key, week_from, week_to)
    }

    pub fn get_playoff_bracket(&self, bracket_type: Option<BracketType>) -> Result<Value> {
        self.database()?.get_playoff_bracket(bracket_type)
    }

    pub fn get_team_playoff_path(&self, roster_key: &str) -> Result<Value> {
        self.database()?.get_team_playoff_path(roster_key)
    }

    /// Guarded read-only SQL; `limit` defaults to [`DEFAULT_SQL_LIMIT`].
    pub fn run_sql(&self, query: &str, params: &[Value], limit: Option<u32>) -> Result<Value> {
        self.database()?
            .run_sql(query, params, Some(limit.unwrap_or(DEFAULT_SQL_LIMIT)))
    }
}
