//! Unified caching system for both in-memory LRU cache and persistent file storage
//!
//! This module provides a two-tier caching system:
//! - L1 Cache: In-memory LRU cache for fast access
//! - L2 Cache: JSON files under the user cache directory
//!
//! Entries carry the time they were stored and are treated as misses once
//! they are older than the cache's time-to-live.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    hash::Hash,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::debug;

/// Default lifetime of a cached source response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Base directory for on-disk cache entries: `~/.cache/sleeper-ffl`
pub fn cache_root() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("sleeper-ffl")
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Generic cache key that can be used for both memory and disk caching
pub trait CacheKey: Hash + Eq + Clone + Send + Sync {
    /// Generate a string representation for file system storage
    fn to_file_key(&self) -> String;

    /// Generate the file path for this cache entry under `root`
    fn to_file_path(&self, root: &Path) -> PathBuf {
        root.join(format!("{}.json", self.to_file_key()))
    }
}

/// Cache key for one source endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceCacheKey {
    /// League id, or the sport for league-independent endpoints
    pub scope: String,
    /// Endpoint name, including the week where the endpoint is weekly
    pub resource: String,
}

impl SourceCacheKey {
    pub fn new(scope: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            resource: resource.into(),
        }
    }
}

impl CacheKey for SourceCacheKey {
    fn to_file_key(&self) -> String {
        let sanitize = |s: &str| -> String {
            s.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect()
        };
        format!("{}_{}", sanitize(&self.scope), sanitize(&self.resource))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedEntry<V> {
    stored_at: u64,
    value: V,
}

/// Unified cache that combines LRU memory cache with file system persistence
pub struct UnifiedCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + for<'de> Deserialize<'de>,
{
    memory_cache: Arc<Mutex<LruCache<K, CachedEntry<V>>>>,
    memory_capacity: usize,
    disk_root: Option<PathBuf>,
    ttl: Duration,
}

impl<K, V> UnifiedCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + for<'de> Deserialize<'de>,
{
    /// Create a memory-only cache with specified capacity
    pub fn new(memory_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(memory_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            memory_cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            memory_capacity: capacity.get(),
            disk_root: None,
            ttl: DEFAULT_TTL,
        }
    }

    /// Persist entries as JSON files under `root`
    pub fn with_disk_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.disk_root = Some(root.into());
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn is_fresh(&self, entry: &CachedEntry<V>) -> bool {
        now_secs().saturating_sub(entry.stored_at) < self.ttl.as_secs()
    }

    /// Get an item from cache (checks memory first, then disk)
    pub fn get(&self, key: &K) -> Option<V> {
        if let Ok(mut memory) = self.memory_cache.lock() {
            if let Some(entry) = memory.get(key) {
                if self.is_fresh(entry) {
                    return Some(entry.value.clone());
                }
                memory.pop(key);
            }
        }

        let entry = self.get_from_disk(key)?;
        if !self.is_fresh(&entry) {
            debug!(key = %key.to_file_key(), "Disk cache entry expired");
            return None;
        }

        // Promote to memory cache
        let value = entry.value.clone();
        if let Ok(mut memory) = self.memory_cache.lock() {
            memory.put(key.clone(), entry);
        }
        Some(value)
    }

    /// Put an item into cache (stores in both memory and disk)
    pub fn put(&self, key: K, value: V) {
        let entry = CachedEntry {
            stored_at: now_secs(),
            value,
        };

        if let Err(e) = self.put_to_disk(&key, &entry) {
            debug!(key = %key.to_file_key(), error = %e, "Failed to write disk cache");
        }

        if let Ok(mut memory) = self.memory_cache.lock() {
            memory.put(key, entry);
        }
    }

    fn get_from_disk(&self, key: &K) -> Option<CachedEntry<V>> {
        let root = self.disk_root.as_ref()?;
        let content = try_read_to_string(&key.to_file_path(root))?;
        serde_json::from_str(&content).ok()
    }

    fn put_to_disk(&self, key: &K, entry: &CachedEntry<V>) -> std::io::Result<()> {
        let Some(root) = self.disk_root.as_ref() else {
            return Ok(());
        };
        let content = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        write_string(&key.to_file_path(root), &content)
    }

    /// Drop an entry from both tiers (used when a refresh is forced)
    pub fn invalidate(&self, key: &K) -> std::io::Result<()> {
        if let Ok(mut memory) = self.memory_cache.lock() {
            memory.pop(key);
        }
        if let Some(root) = self.disk_root.as_ref() {
            let path = key.to_file_path(root);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Clear memory cache only (keeps disk cache)
    pub fn clear_memory(&self) {
        if let Ok(mut memory) = self.memory_cache.lock() {
            memory.clear();
        }
    }

    /// Get memory cache statistics
    pub fn memory_stats(&self) -> (usize, usize) {
        let used = self.memory_cache.lock().map(|m| m.len()).unwrap_or(0);
        (used, self.memory_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cache_root() {
        let path = cache_root();
        assert!(path.to_string_lossy().contains("sleeper-ffl"));
    }

    #[test]
    fn test_try_read_to_string_nonexistent_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nonexistent.txt");

        assert_eq!(try_read_to_string(&file_path), None);
    }

    #[test]
    fn test_write_string_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("subdir").join("output.txt");

        write_string(&file_path, "test content").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "test content");
    }

    #[test]
    fn test_source_key_file_name() {
        let key = SourceCacheKey::new("1048313545995296768", "matchups/8");
        assert_eq!(key.to_file_key(), "1048313545995296768_matchups_8");

        let root = Path::new("/tmp/cache");
        assert_eq!(
            key.to_file_path(root),
            root.join("1048313545995296768_matchups_8.json")
        );
    }

    #[test]
    fn test_memory_hit_and_eviction() {
        let cache: UnifiedCache<SourceCacheKey, Value> = UnifiedCache::new(2);

        let k1 = SourceCacheKey::new("L", "users");
        let k2 = SourceCacheKey::new("L", "rosters");
        let k3 = SourceCacheKey::new("L", "league");

        cache.put(k1.clone(), json!([1]));
        assert_eq!(cache.get(&k1), Some(json!([1])));

        cache.put(k2, json!([2]));
        cache.put(k3, json!([3]));

        assert_eq!(cache.memory_stats(), (2, 2));
        // Memory-only cache: the evicted key is gone
        assert_eq!(cache.get(&k1), None);
    }

    #[test]
    fn test_disk_tier_survives_memory_clear() {
        let dir = tempdir().unwrap();
        let cache: UnifiedCache<SourceCacheKey, Value> =
            UnifiedCache::new(4).with_disk_root(dir.path());

        let key = SourceCacheKey::new("nfl", "state");
        cache.put(key.clone(), json!({"week": 8}));
        cache.clear_memory();
        assert_eq!(cache.memory_stats().0, 0);

        assert_eq!(cache.get(&key), Some(json!({"week": 8})));
        // Promoted back into memory
        assert_eq!(cache.memory_stats().0, 1);
    }

    #[test]
    fn test_expired_entries_are_misses() {
        let dir = tempdir().unwrap();
        let cache: UnifiedCache<SourceCacheKey, Value> = UnifiedCache::new(4)
            .with_disk_root(dir.path())
            .with_ttl(Duration::from_secs(0));

        let key = SourceCacheKey::new("L", "league");
        cache.put(key.clone(), json!({"league_id": "L"}));
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn test_invalidate_removes_both_tiers() {
        let dir = tempdir().unwrap();
        let cache: UnifiedCache<SourceCacheKey, Value> =
            UnifiedCache::new(4).with_disk_root(dir.path());

        let key = SourceCacheKey::new("L", "users");
        cache.put(key.clone(), json!([]));
        assert!(key.to_file_path(dir.path()).exists());

        cache.invalidate(&key).unwrap();
        assert!(!key.to_file_path(dir.path()).exists());
        assert_eq!(cache.get(&key), None);
    }
}
