//! Core utilities shared across the crate
//!
//! - `cache`: two-tier (memory + disk) response cache

pub mod cache;

// Re-export commonly used items for convenience
pub use cache::{
    cache_root, try_read_to_string, write_string, CacheKey, SourceCacheKey, UnifiedCache,
};
