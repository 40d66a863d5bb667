//! Sleeper API boundary
//!
//! - `source`: the [`LeagueSource`] contract the loader consumes
//! - `http`: reqwest-backed client with response caching
//! - `types`: lenient raw payload contracts

pub mod http;
pub mod source;
pub mod types;

pub use http::SleeperClient;
pub use source::LeagueSource;
