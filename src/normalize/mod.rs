//! Pure normalizers and derivations
//!
//! Every function here maps already-validated raw payload contracts (see
//! [`crate::sleeper::types`]) into storage records. None of them perform I/O;
//! the only failure mode is a malformed required field, reported as
//! [`SleeperError::Normalize`](crate::SleeperError::Normalize).

pub mod bracket;
pub mod league;
pub mod matchups;
pub mod picks;
pub mod players;
pub mod rosters;
pub mod standings;
pub mod transactions;

pub use bracket::normalize_bracket;
pub use league::{normalize_league, normalize_users, season_context};
pub use matchups::{derive_games, normalize_matchups};
pub use picks::{apply_traded_picks, seed_draft_picks};
pub use players::{normalize_players, player_display_name};
pub use rosters::{derive_team_profiles, normalize_roster_players, normalize_rosters};
pub use standings::{derive_standings, round2, standings_at};
pub use transactions::{dedupe_transactions, normalize_transaction_moves, normalize_transactions};
