//! HTTP client for the Sleeper read API

use super::source::LeagueSource;
use crate::{
    config::{REQUEST_TIMEOUT_SECS, SLEEPER_BASE_URL},
    core::cache::{cache_root, SourceCacheKey, UnifiedCache},
    error::{Result, SleeperError},
    LeagueId, Week,
};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = "sleeper-ffl";
const SPORT: &str = "nfl";

/// Fetches league payloads from `api.sleeper.app`, caching each response.
pub struct SleeperClient {
    http: Client,
    base_url: String,
    league_id: LeagueId,
    cache: UnifiedCache<SourceCacheKey, Value>,
    refresh: bool,
}

impl SleeperClient {
    /// Client for `league_id` with the on-disk cache enabled.
    ///
    /// With `refresh` set, every request goes to the network and overwrites
    /// whatever was cached.
    pub fn new(league_id: LeagueId, refresh: bool) -> Result<Self> {
        let cache = UnifiedCache::new(64).with_disk_root(cache_root());
        Self::with_cache(league_id, SLEEPER_BASE_URL, cache, refresh)
    }

    pub fn with_cache(
        league_id: LeagueId,
        base_url: impl Into<String>,
        cache: UnifiedCache<SourceCacheKey, Value>,
        refresh: bool,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            league_id,
            cache,
            refresh,
        })
    }

    pub fn league_id(&self) -> &LeagueId {
        &self.league_id
    }

    fn league_path(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("league/{}", self.league_id)
        } else {
            format!("league/{}/{}", self.league_id, suffix)
        }
    }

    async fn get_league_json(&self, suffix: &str) -> Result<Value> {
        let key = SourceCacheKey::new(self.league_id.as_str(), suffix.to_string());
        self.get_cached(key, &self.league_path(suffix)).await
    }

    async fn get_cached(&self, key: SourceCacheKey, path: &str) -> Result<Value> {
        if self.refresh {
            self.cache.invalidate(&key)?;
        } else if let Some(hit) = self.cache.get(&key) {
            debug!(path, "Cache hit");
            return Ok(hit);
        }

        debug!(path, "Cache miss");
        let value = self.fetch(path).await?;
        self.cache.put(key, value.clone());
        Ok(value)
    }

    async fn fetch(&self, path: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        info!(url = %url, "Fetching");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SleeperError::Api {
                url,
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Err(SleeperError::EmptyResponse { url });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl LeagueSource for SleeperClient {
    async fn league(&self) -> Result<Value> {
        self.get_league_json("").await
    }

    async fn users(&self) -> Result<Value> {
        self.get_league_json("users").await
    }

    async fn rosters(&self) -> Result<Value> {
        self.get_league_json("rosters").await
    }

    async fn matchups(&self, week: Week) -> Result<Value> {
        self.get_league_json(&format!("matchups/{}", week)).await
    }

    async fn transactions(&self, week: Week) -> Result<Value> {
        self.get_league_json(&format!("transactions/{}", week)).await
    }

    async fn traded_picks(&self) -> Result<Value> {
        self.get_league_json("traded_picks").await
    }

    async fn players(&self) -> Result<Value> {
        let key = SourceCacheKey::new(SPORT, "players");
        self.get_cached(key, &format!("players/{}", SPORT)).await
    }

    async fn state(&self) -> Result<Value> {
        // Always live: the current week is what decides how much to load
        self.fetch(&format!("state/{}", SPORT)).await
    }

    async fn winners_bracket(&self) -> Result<Value> {
        self.get_league_json("winners_bracket").await
    }

    async fn losers_bracket(&self) -> Result<Value> {
        self.get_league_json("losers_bracket").await
    }
}
