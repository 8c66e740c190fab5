//! Process-wide cache of parsed logs with time-based expiry.
//!
//! Entries expire a fixed TTL after they are stored and are checked on read.
//! There is no background eviction and no LRU ordering: when the map is full,
//! expired entries are purged first and then the entry closest to expiry goes.
//!
//! The lock is only held for lookups and stores. Two callers missing on the
//! same key can both parse; the later store wins. Parsing is a pure function
//! of the log bytes, so both values are equivalent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::{Duration, Instant};

use pv_core::timing::{Timer, log_timing};
use pv_log::{LogPath, LogReader, ParseResult};
use pv_project::PlotSettings;
use sha2::{Digest, Sha256};

use crate::error::AppResult;

pub const DEFAULT_TTL: Duration = Duration::from_secs(120);
pub const DEFAULT_CAPACITY: usize = 64;

/// Monotonic time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cache key for a log: `FOAMLOG_` plus the SHA-256 of its path.
pub fn cache_key(path: &LogPath) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_path().to_string_lossy().as_bytes());
    format!("FOAMLOG_{:x}", hasher.finalize())
}

struct CacheEntry {
    value: Arc<ParseResult>,
    expires_at: Instant,
}

pub struct ResultCache {
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

static GLOBAL: OnceLock<Arc<ResultCache>> = OnceLock::new();

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &PlotSettings) -> Self {
        Self::new(
            Duration::from_secs(settings.cache_ttl_s),
            settings.cache_capacity,
        )
    }

    /// The process-wide cache, created from `settings` if this is the first use.
    /// Later calls get the existing instance whatever settings they pass.
    pub fn global_with(settings: &PlotSettings) -> Arc<ResultCache> {
        GLOBAL
            .get_or_init(|| Arc::new(ResultCache::from_settings(settings)))
            .clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Live entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Arc<ParseResult>> {
        let now = self.clock.now();
        let entries = self.lock();
        entries
            .get(key)
            .filter(|e| now < e.expires_at)
            .map(|e| e.value.clone())
    }

    /// Store `value` under `key`, expiring one TTL from now.
    pub fn insert(&self, key: String, value: Arc<ParseResult>) {
        let now = self.clock.now();
        let mut entries = self.lock();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, e| now < e.expires_at);
            if entries.len() >= self.capacity {
                let soonest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(k) = soonest {
                    entries.remove(&k);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Return the live entry for `key` or compute, store and return a new one.
    /// Errors from `compute` are passed through and nothing is stored.
    pub fn get_or_compute<F, E>(&self, key: &str, compute: F) -> Result<Arc<ParseResult>, E>
    where
        F: FnOnce() -> Result<ParseResult, E>,
    {
        let timer = Timer::start();
        if let Some(hit) = self.get(key) {
            timer.stop_into(&log_timing::CACHE_HIT);
            tracing::debug!(key, "log cache hit");
            return Ok(hit);
        }

        tracing::debug!(key, "log cache miss");
        let value = Arc::new(compute()?);
        self.insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// Parsed contents of the log at `path`, from cache when fresh.
    pub fn get_or_parse(
        &self,
        reader: &dyn LogReader,
        path: &LogPath,
    ) -> AppResult<Arc<ParseResult>> {
        let key = cache_key(path);
        self.get_or_compute(&key, || pv_log::parse_log(reader, path))
            .map_err(Into::into)
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| now < e.expires_at);
        before - entries.len()
    }
}
