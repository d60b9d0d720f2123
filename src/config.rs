//! Configuration Module
//!
//! Handles loading and managing service and cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Shortest allowed interval between age-based cleans.
pub const MIN_CLEAN_PERIOD_MS: u64 = 60_000;

/// Shortest allowed interval between sync passes.
pub const MIN_SYNC_PERIOD_MS: u64 = 1_800_000;

/// Default debounce before a scheduled ledger compaction runs.
pub const DEFAULT_COMPACTION_DELAY_MS: u64 = 5_000;

/// Item cache parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// When set, the service serves every request from the catalog directly
    pub disabled: bool,
    /// Maximum number of records the cache holds; 0 keeps nothing
    pub max_items: usize,
    /// Age in milliseconds after which an untouched record is cleaned out
    pub record_lifetime_ms: u64,
    /// Requested interval between cleans (floored at one minute)
    pub clean_period_ms: u64,
    /// Requested interval between sync passes (floored at thirty minutes)
    pub sync_period_ms: u64,
    /// Delay before a scheduled ledger compaction runs
    pub compaction_delay_ms: u64,
}

impl CacheConfig {
    /// Effective clean interval after applying the floor.
    pub fn clean_period(&self) -> Duration {
        Duration::from_millis(self.clean_period_ms.max(MIN_CLEAN_PERIOD_MS))
    }

    /// Effective sync interval after applying the floor.
    pub fn sync_period(&self) -> Duration {
        Duration::from_millis(self.sync_period_ms.max(MIN_SYNC_PERIOD_MS))
    }

    /// Delay between scheduling and running a ledger compaction.
    pub fn compaction_delay(&self) -> Duration {
        Duration::from_millis(self.compaction_delay_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            max_items: 1000,
            record_lifetime_ms: 3_600_000,
            clean_period_ms: MIN_CLEAN_PERIOD_MS,
            sync_period_ms: MIN_SYNC_PERIOD_MS,
            compaction_delay_ms: DEFAULT_COMPACTION_DELAY_MS,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Whether the cache refreshes its records from the catalog
    pub sync_enabled: bool,
    /// Item cache parameters
    pub cache: CacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_SYNC_ENABLED` - Refresh cached records from the catalog (default: true)
    /// - `CACHE_DISABLED` - Bypass the cache entirely (default: false)
    /// - `CACHE_MAX_ITEMS` - Maximum cached records (default: 1000)
    /// - `CACHE_RECORD_LIFETIME_MS` - Age limit of untouched records (default: 3600000)
    /// - `CACHE_CLEAN_PERIOD_MS` - Clean frequency, at least 60000 (default: 60000)
    /// - `CACHE_SYNC_PERIOD_MS` - Sync frequency, at least 1800000 (default: 1800000)
    /// - `CACHE_COMPACTION_DELAY_MS` - Ledger compaction debounce (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cache = defaults.cache;

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sync_enabled: env_or("CACHE_SYNC_ENABLED", defaults.sync_enabled),
            cache: CacheConfig {
                disabled: env_or("CACHE_DISABLED", cache.disabled),
                max_items: env_or("CACHE_MAX_ITEMS", cache.max_items),
                record_lifetime_ms: env_or("CACHE_RECORD_LIFETIME_MS", cache.record_lifetime_ms),
                clean_period_ms: env_or("CACHE_CLEAN_PERIOD_MS", cache.clean_period_ms),
                sync_period_ms: env_or("CACHE_SYNC_PERIOD_MS", cache.sync_period_ms),
                compaction_delay_ms: env_or(
                    "CACHE_COMPACTION_DELAY_MS",
                    cache.compaction_delay_ms,
                ),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            sync_enabled: true,
            cache: CacheConfig::default(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
