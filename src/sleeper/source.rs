//! The source of raw league payloads consumed by the loader

use crate::{Result, Week};
use serde_json::Value;

/// Anything that can hand back raw Sleeper JSON for one league.
///
/// [`SleeperClient`](super::SleeperClient) fetches over HTTP; tests provide
/// in-memory fixtures. Each call returns the parsed response body or fails.
#[allow(async_fn_in_trait)]
pub trait LeagueSource {
    async fn league(&self) -> Result<Value>;

    async fn users(&self) -> Result<Value>;

    async fn rosters(&self) -> Result<Value>;

    async fn matchups(&self, week: Week) -> Result<Value>;

    async fn transactions(&self, week: Week) -> Result<Value>;

    async fn traded_picks(&self) -> Result<Value>;

    /// The full NFL player dictionary, keyed by player id.
    async fn players(&self) -> Result<Value>;

    /// Current NFL state (season and week).
    async fn state(&self) -> Result<Value>;

    async fn winners_bracket(&self) -> Result<Value>;

    async fn losers_bracket(&self) -> Result<Value>;
}
