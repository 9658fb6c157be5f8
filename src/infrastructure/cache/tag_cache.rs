use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::entities::resource::ResourceChanged;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct CacheEntry {
    tag: &'static str,
    value: Value,
    stored_at: Instant,
}

/// Read cache keyed by request identity and grouped under resource tags.
///
/// Invalidating a tag drops every entry stored under it and bumps the tag's
/// generation. A read that started before the bump must not be stored, see
/// [`TagCache::insert_if_current`]. Listeners learn about changes through
/// [`TagCache::subscribe`].
#[derive(Debug)]
pub struct TagCache {
    entries: DashMap<String, CacheEntry>,
    generations: DashMap<&'static str, u64>,
    ttl: Option<Duration>,
    events: broadcast::Sender<ResourceChanged>,
}

impl TagCache {
    /// `ttl` of `None` keeps entries until their tag is invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        TagCache { entries: DashMap::new(), generations: DashMap::new(), ttl, events }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        self.ttl.is_none_or(|ttl| now.duration_since(entry.stored_at) < ttl)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value.clone());

        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| !self.is_fresh(entry, now));
        }
        hit
    }

    pub fn insert(&self, key: String, tag: &'static str, value: Value) {
        self.entries.insert(key, CacheEntry { tag, value, stored_at: Instant::now() });
    }

    /// Current generation of `tag`. Capture it before fetching a value to store.
    pub fn generation(&self, tag: &str) -> u64 {
        self.generations.get(tag).map_or(0, |generation| *generation)
    }

    /// Stores `value` only if `tag` has not been invalidated since `generation`
    /// was read. Returns whether the value was stored.
    pub fn insert_if_current(&self, key: String, tag: &'static str, generation: u64, value: Value) -> bool {
        // Generation guard is held across the insert; invalidate takes the same lock first.
        let current = self.generations.entry(tag).or_insert(0);
        if *current != generation {
            tracing::debug!(%key, tag, "Discarding read that raced an invalidation");
            return false;
        }
        self.insert(key, tag, value);
        true
    }

    /// Drops every entry under `tag`, bumps its generation and returns how many
    /// entries were removed.
    pub fn invalidate(&self, tag: &'static str) -> usize {
        let mut generation = self.generations.entry(tag).or_insert(0);
        *generation += 1;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.tag != tag);
        let removed = before.saturating_sub(self.entries.len());
        drop(generation);
        tracing::debug!(tag, removed, "Cache tag invalidated");
        removed
    }

    /// Publishes a change. Having no subscribers is not an error.
    pub fn notify(&self, event: ResourceChanged) {
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ResourceChanged> {
        self.events.subscribe()
    }

    pub fn purge_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
