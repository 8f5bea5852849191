//! Argument-keyed memoization with expiry and an optional entry cap.

use std::{
  collections::VecDeque,
  hash::Hash,
  num::NonZeroUsize,
  sync::{Mutex, MutexGuard, PoisonError},
  time::{Duration, Instant},
};

use ahash::AHashMap;

/// Caches the results of one operation, keyed by its arguments.
///
/// Entries expire `ttl` after insertion; without a ttl they live until
/// evicted. With `max_entries` set, an insertion into a full cache first
/// drops expired entries and then, if still full, the oldest inserted one.
///
/// Only successful results are stored. The lock covers bookkeeping, never
/// the computation, so two callers missing the same key at once will both
/// compute it; the later insert replaces the earlier one.
pub struct TtlCache<K, V> {
  ttl: Option<Duration>,
  max_entries: Option<NonZeroUsize>,
  inner: Mutex<Inner<K, V>>,
}

struct Entry<V> {
  value: V,
  /// `None` never expires.
  expires_at: Option<Instant>,
}

impl<V> Entry<V> {
  #[inline]
  fn is_expired(&self, now: Instant) -> bool {
    self.expires_at.is_some_and(|expires_at| now >= expires_at)
  }
}

struct Inner<K, V> {
  entries: AHashMap<K, Entry<V>>,
  /// Insertion order, only tracked for capped caches.
  order: VecDeque<K>,
}

impl<K: Eq + Hash, V> Inner<K, V> {
  fn purge_expired(&mut self, now: Instant) {
    self.entries.retain(|_, entry| !entry.is_expired(now));
    let entries = &self.entries;
    self.order.retain(|key| entries.contains_key(key));
  }
}

impl<K, V> TtlCache<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  pub fn new(ttl: Option<Duration>, max_entries: Option<NonZeroUsize>) -> Self {
    Self {
      ttl,
      max_entries,
      inner: Mutex::new(Inner {
        entries: AHashMap::new(),
        order: VecDeque::new(),
      }),
    }
  }

  #[inline]
  pub fn with_ttl(ttl: Duration) -> Self {
    Self::new(Some(ttl), None)
  }

  #[inline]
  pub fn with_capacity(max_entries: NonZeroUsize) -> Self {
    Self::new(None, Some(max_entries))
  }

  /// Returns the fresh cached value for `key`, or runs `f` and caches its
  /// `Ok` result. Errors are returned as is and leave the cache untouched.
  pub fn get_or_try_insert_with<E, F>(&self, key: K, f: F) -> Result<V, E>
  where
    F: FnOnce() -> Result<V, E>,
  {
    if let Some(value) = self.get_at(&key, Instant::now()) {
      return Ok(value);
    }
    let value = f()?;
    self.insert_at(key, value.clone(), Instant::now());
    Ok(value)
  }

  fn get_at(&self, key: &K, now: Instant) -> Option<V> {
    let inner = self.lock();
    inner
      .entries
      .get(key)
      .filter(|entry| !entry.is_expired(now))
      .map(|entry| entry.value.clone())
  }

  fn insert_at(&self, key: K, value: V, now: Instant) {
    let expires_at = self.ttl.and_then(|ttl| now.checked_add(ttl));
    let mut inner = self.lock();

    if let Some(max_entries) = self.max_entries {
      if inner.entries.contains_key(&key) {
        // re-insertion counts as a new insertion
        inner.order.retain(|queued| queued != &key);
      } else if inner.entries.len() >= max_entries.get() {
        inner.purge_expired(now);
        if inner.entries.len() >= max_entries.get() {
          if let Some(oldest) = inner.order.pop_front() {
            inner.entries.remove(&oldest);
          }
        }
      }
      inner.order.push_back(key.clone());
    }

    inner.entries.insert(key, Entry { value, expires_at });
  }

  pub fn invalidate(&self, key: &K) {
    let mut inner = self.lock();
    if inner.entries.remove(key).is_some() {
      inner.order.retain(|queued| queued != key);
    }
  }

  pub fn clear(&self) {
    let mut inner = self.lock();
    inner.entries.clear();
    inner.order.clear();
  }

  /// Stored entries, expired ones included until they are purged.
  pub fn len(&self) -> usize {
    self.lock().entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[inline]
  fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
