//! Cached statistics payloads.
//!
//! Statistics endpoints aggregate whole tables, so results are kept for a
//! short TTL and dropped as soon as a mutation touches their source.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use serde_json::Value;
use tracing::debug;

/// Named statistics entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsKey {
    /// Employee head counts.
    EmployeeStatistics,
    /// Leave balance totals.
    LeaveStatistics,
}

impl StatsKey {
    /// Entry name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmployeeStatistics => "employee_statistics",
            Self::LeaveStatistics => "leave_statistics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Entry {
    key: StatsKey,
    scope: String,
}

/// Statistics cache shared by request handlers.
#[derive(Clone)]
pub struct StatsCache {
    cache: Cache<Entry, Arc<Value>>,
}

impl StatsCache {
    /// Creates a cache holding at most `max_capacity` entries for `ttl_secs` each.
    #[must_use]
    pub fn new(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();
        Self { cache }
    }

    /// Cached payload for `key` under `scope` (e.g. a year; empty for none).
    #[must_use]
    pub fn get(&self, key: StatsKey, scope: &str) -> Option<Arc<Value>> {
        self.cache.get(&Entry {
            key,
            scope: scope.to_string(),
        })
    }

    /// Stores a payload and returns it shared.
    pub fn insert(&self, key: StatsKey, scope: &str, value: Value) -> Arc<Value> {
        let value = Arc::new(value);
        self.cache.insert(
            Entry {
                key,
                scope: scope.to_string(),
            },
            Arc::clone(&value),
        );
        value
    }

    /// Drops every scope of a named entry.
    pub fn invalidate(&self, key: StatsKey) {
        debug!(key = key.as_str(), "invalidating statistics cache");
        if self
            .cache
            .invalidate_entries_if(move |entry, _| entry.key == key)
            .is_err()
        {
            self.cache.invalidate_all();
        }
    }

    /// Drops everything.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new(64, 300)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_insert_get_invalidate() {
        let cache = StatsCache::default();
        cache.insert(StatsKey::EmployeeStatistics, "", json!({"total": 3}));
        cache.insert(StatsKey::LeaveStatistics, "2025", json!({"types": []}));
        cache.insert(StatsKey::LeaveStatistics, "2024", json!({"types": []}));

        assert_eq!(
            cache.get(StatsKey::EmployeeStatistics, "").as_deref(),
            Some(&json!({"total": 3}))
        );

        cache.invalidate(StatsKey::LeaveStatistics);
        cache.cache.run_pending_tasks();

        assert!(cache.get(StatsKey::LeaveStatistics, "2025").is_none());
        assert!(cache.get(StatsKey::LeaveStatistics, "2024").is_none());
        assert!(cache.get(StatsKey::EmployeeStatistics, "").is_some());
    }
}
