//! Read-only queries over a loaded league
//!
//! Every query is an inherent method on [`LeagueDatabase`](crate::storage::LeagueDatabase),
//! grouped by subject:
//! - `resolvers`: player and roster keys to ids, with explicit ambiguity
//! - `league`: snapshot, standings, weekly games, leaderboards, bench points
//! - `team`: dossier, schedule, current and historical rosters
//! - `player`: summary and weekly log
//! - `transactions`: grouped trades, waivers and free-agent moves
//! - `playoffs`: brackets and a team's playoff path
//! - `sql_tool`: guarded free-form SELECT

pub mod helpers;
pub mod league;
pub mod output;
pub mod player;
pub mod playoffs;
pub mod resolvers;
pub mod sql_tool;
pub mod team;
pub mod transactions;


pub use output::*;
pub use resolvers::{PlayerMatch, Resolution, RosterMatch};
pub use sql_tool::DEFAULT_SQL_LIMIT;
