//! Sleeper Fantasy Football League Data Library
//!
//! Loads a Sleeper league into an in-memory SQLite database and answers
//! structured, name-aware questions about it: standings, games, rosters,
//! players, transactions and the playoff bracket.
//!
//! ## Features
//!
//! - **Normalization**: raw Sleeper JSON validated into typed records
//! - **Derivations**: head-to-head games, weekly standings, player performances,
//!   draft pick ownership
//! - **Name Resolution**: players and teams by id or case-insensitive name, with explicit ambiguity
//! - **Guarded SQL**: read-only, row-bounded ad-hoc queries
//! - **Tool Schemas**: function-calling descriptions for every query
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sleeper_ffl::{SleeperClient, SleeperConfig, SleeperLeagueData};
//!
//! # async fn example() -> sleeper_ffl::Result<()> {
//! let config = SleeperConfig::from_env()?;
//! let client = SleeperClient::new(config.league_id.clone(), false)?;
//! let mut data = SleeperLeagueData::new(config, client);
//!
//! data.load().await?;
//! let games = data.get_week_games(None)?;
//! println!("{}", serde_json::to_string_pretty(&games)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export SLEEPER_LEAGUE_ID=1048313545995296768
//! export SLEEPER_WEEK_OVERRIDE=8   # optional
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod league_data;
pub mod normalize;
pub mod queries;
pub mod sleeper;
pub mod storage;
pub mod tools;

// Re-export commonly used types
pub use cli::types::{LeagueId, PlayerId, RosterId, Season, Week};
pub use config::SleeperConfig;
pub use error::{Result, SleeperError};
pub use league_data::SleeperLeagueData;
pub use queries::resolvers::{PlayerMatch, Resolution, RosterMatch};
pub use sleeper::{LeagueSource, SleeperClient};
pub use storage::LeagueDatabase;

pub const LEAGUE_ID_ENV_VAR: &str = "SLEEPER_LEAGUE_ID";
pub const WEEK_OVERRIDE_ENV_VAR: &str = "SLEEPER_WEEK_OVERRIDE";
