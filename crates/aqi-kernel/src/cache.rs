//! TTL-bounded result cache with an injected clock.
//!
//! The cache is an explicit object rather than ambient process state: the
//! clock comes in through a trait so tests can drive time, and the TTL is a
//! constructor parameter. The cache itself is single-threaded; callers
//! serving concurrent requests wrap it in a lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::result::PipelineResult;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CacheEntry {
    value: PipelineResult,
    created_at: DateTime<Utc>,
}

/// Key-value cache of pipeline results with per-entry time-to-live.
///
/// An entry is valid strictly while `now - created_at <= ttl`; after that
/// it is treated as absent. Expired entries are not deleted, only shadowed
/// by the next `set` for the same key, so memory grows with distinct keys.
pub struct ResultCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: HashMap<String, CacheEntry>,
}

impl ResultCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Look up a key, returning `None` for missing or expired entries.
    pub fn get(&self, key: &str) -> Option<PipelineResult> {
        let entry = self.entries.get(key)?;
        if self.clock.now() - entry.created_at <= self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Store a value, unconditionally replacing any previous entry and
    /// stamping the current time.
    pub fn set(&mut self, key: impl Into<String>, value: PipelineResult) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                created_at: self.clock.now(),
            },
        );
    }

    /// Number of entries held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
