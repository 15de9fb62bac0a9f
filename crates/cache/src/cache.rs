use crate::key::CacheKey;
use crate::lru::{Insertion, LruMap};
use sdui_protocol::ComponentDescriptor;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

/// Default maximum number of cached trees
pub const DEFAULT_CAPACITY: usize = 50;

/// A cached descriptor tree and the moment it was stored
///
/// `created_at` is informational; eviction only looks at access order.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    descriptor: Arc<ComponentDescriptor>,
    created_at: SystemTime,
}

impl CacheEntry {
    #[must_use]
    pub fn new(descriptor: Arc<ComponentDescriptor>) -> Self {
        Self {
            descriptor,
            created_at: SystemTime::now(),
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &Arc<ComponentDescriptor> {
        &self.descriptor
    }

    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Time since the entry was stored (zero if the clock went backwards)
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed().unwrap_or_default()
    }
}

/// Point-in-time counters for a [`DescriptorCache`]
///
/// `insertions - evictions - cleared == size` holds at every snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub replacements: u64,
    pub evictions: u64,
    /// Entries dropped by [`DescriptorCache::clear`]
    pub cleared: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit, 0.0 when nothing was looked up yet
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

#[derive(Debug)]
struct CacheState {
    entries: LruMap<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
    insertions: u64,
    replacements: u64,
    evictions: u64,
    cleared: u64,
}

/// Bounded, thread-safe map from [`CacheKey`] to parsed descriptor trees
///
/// A single mutex guards every operation, so `get`, `put`, `contains`, `size`
/// and `clear` never observe each other half-done. Nothing inside the lock
/// performs I/O.
#[derive(Debug)]
pub struct DescriptorCache {
    state: Mutex<CacheState>,
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DescriptorCache {
    /// Create a cache holding at most `capacity` trees (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: LruMap::new(capacity),
                hits: 0,
                misses: 0,
                insertions: 0,
                replacements: 0,
                evictions: 0,
                cleared: 0,
            }),
        }
    }

    /// Fetch a tree and mark it most recently used
    pub fn get(&self, key: &CacheKey) -> Option<Arc<ComponentDescriptor>> {
        self.get_entry(key).map(|entry| entry.descriptor)
    }

    /// Like [`Self::get`] but returns the whole entry
    pub fn get_entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut state = self.lock();
        let found = state.entries.get(key.as_str()).cloned();
        if found.is_some() {
            state.hits += 1;
            log::debug!("descriptor cache hit {}", short(key));
        } else {
            state.misses += 1;
            log::debug!("descriptor cache miss {}", short(key));
        }
        found
    }

    /// Store a tree, evicting the least recently used entry when full
    ///
    /// Storing under an existing key replaces the tree and refreshes recency.
    pub fn put(&self, key: CacheKey, descriptor: impl Into<Arc<ComponentDescriptor>>) {
        let entry = CacheEntry::new(descriptor.into());
        let mut state = self.lock();
        let label = short(&key).to_string();
        match state.entries.insert(key, entry) {
            Insertion::Added => state.insertions += 1,
            Insertion::Replaced => state.replacements += 1,
            Insertion::Evicted(evicted, _) => {
                state.insertions += 1;
                state.evictions += 1;
                log::debug!(
                    "descriptor cache evicted {} to store {label}",
                    short(&evicted)
                );
            }
        }
    }

    /// Membership test; does not change recency
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains(key.as_str())
    }

    /// Creation time of a cached entry without touching recency
    pub fn created_at(&self, key: &CacheKey) -> Option<SystemTime> {
        self.lock()
            .entries
            .peek(key.as_str())
            .map(CacheEntry::created_at)
    }

    pub fn size(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.lock().entries.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Drop every entry; counters are kept and the dropped count is added to `cleared`
    pub fn clear(&self) {
        let mut state = self.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        state.cleared += dropped as u64;
        log::debug!("descriptor cache cleared ({dropped} entries)");
    }

    /// Keys from most to least recently used
    pub fn keys_by_recency(&self) -> Vec<CacheKey> {
        self.lock().entries.keys_by_recency()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            insertions: state.insertions,
            replacements: state.replacements,
            evictions: state.evictions,
            cleared: state.cleared,
            size: state.entries.len(),
            capacity: state.entries.capacity(),
        }
    }

    // State is consistent between operations, so a panic in another holder
    // cannot leave a half-linked list behind.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn short(key: &CacheKey) -> &str {
    let s = key.as_str();
    &s[..12.min(s.len())]
}
