//! Resource cache with staleness windows
//!
//! Fetched collections are cached under logical resource names
//! ("archives", "projects", "tags", ...). Reads within the staleness
//! window reuse the committed snapshot; mutations invalidate by name so
//! the next read refetches. The filter engine always runs over the last
//! committed snapshot, never over in-flight data.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::Result;

struct CacheEntry {
    stored_at: Instant,
    value: serde_json::Value,
}

/// TTL cache keyed by logical resource name.
pub struct ResourceCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResourceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Fetch a fresh snapshot if present; stale entries read as misses.
    pub fn get<T: DeserializeOwned>(&self, resource: &str) -> Option<T> {
        let entry = self.entries.get(resource)?;
        if entry.stored_at.elapsed() >= self.ttl {
            tracing::debug!(resource, "cache entry stale");
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Commit a snapshot under `resource`, replacing any prior value.
    pub fn put<T: Serialize>(&mut self, resource: &str, value: &T) -> Result<()> {
        self.entries.insert(
            resource.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                value: serde_json::to_value(value)?,
            },
        );
        Ok(())
    }

    /// Drop one resource so the next read refetches.
    pub fn invalidate(&mut self, resource: &str) {
        if self.entries.remove(resource).is_some() {
            tracing::debug!(resource, "cache invalidated");
        }
    }

    /// Drop a resource together with its scoped variants.
    ///
    /// Scoped snapshots live under `"{resource}:{scope}"` keys (the
    /// printer-scoped archive list, for example); a mutation to the
    /// underlying resource stales all of them at once.
    pub fn invalidate_family(&mut self, resource: &str) {
        let scoped_prefix = format!("{}:", resource);
        let before = self.entries.len();
        self.entries
            .retain(|key, _| key != resource && !key.starts_with(&scoped_prefix));
        if self.entries.len() != before {
            tracing::debug!(resource, "cache family invalidated");
        }
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn contains_fresh(&self, resource: &str) -> bool {
        self.entries
            .get(resource)
            .is_some_and(|e| e.stored_at.elapsed() < self.ttl)
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        // Matches the staleness window the web client uses for archive
        // collections.
        Self::new(Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_then_get_round_trips() {
        let mut cache = ResourceCache::new(Duration::from_secs(60));
        cache.put("tags", &json!(["toys", "gifts"])).unwrap();

        let value: Option<Vec<String>> = cache.get("tags");
        assert_eq!(value, Some(vec!["toys".to_string(), "gifts".to_string()]));
        assert!(cache.contains_fresh("tags"));
    }

    #[test]
    fn test_zero_ttl_reads_as_miss() {
        let mut cache = ResourceCache::new(Duration::from_secs(0));
        cache.put("archives", &json!([1, 2])).unwrap();
        assert!(cache.get::<serde_json::Value>("archives").is_none());
        assert!(!cache.contains_fresh("archives"));
    }

    #[test]
    fn test_invalidate_family_drops_scoped_variants() {
        let mut cache = ResourceCache::new(Duration::from_secs(60));
        cache.put("archives", &json!([1])).unwrap();
        cache.put("archives:printer:2", &json!([2])).unwrap();
        cache.put("archivesx", &json!([3])).unwrap();
        cache.put("projects", &json!([4])).unwrap();

        cache.invalidate_family("archives");
        assert!(cache.get::<serde_json::Value>("archives").is_none());
        assert!(cache
            .get::<serde_json::Value>("archives:printer:2")
            .is_none());
        // Only the resource itself and `resource:*` keys are affected.
        assert!(cache.get::<serde_json::Value>("archivesx").is_some());
        assert!(cache.get::<serde_json::Value>("projects").is_some());
    }

    #[test]
    fn test_invalidate_drops_only_named_resource() {
        let mut cache = ResourceCache::new(Duration::from_secs(60));
        cache.put("archives", &json!([1])).unwrap();
        cache.put("projects", &json!([2])).unwrap();

        cache.invalidate("archives");
        assert!(cache.get::<serde_json::Value>("archives").is_none());
        assert!(cache.get::<serde_json::Value>("projects").is_some());

        cache.invalidate_all();
        assert!(cache.get::<serde_json::Value>("projects").is_none());
    }
}
