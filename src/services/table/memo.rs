//! Row Memoizer
//!
//! Caches a per-row derivation keyed by row identity. Each memoizer declares
//! the fields its derivation reads; a cached value is reused while those
//! fields are unchanged and recomputed as soon as any of them differs.
//! Changes to other fields never trigger recomputation.
//!
//! Entries live in a bounded `mini_moka` cache, so long-lived tables with
//! many distinct rows do not grow without limit.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use mini_moka::sync::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filter::resolve_path;

/// Stable identity of a row across reloads.
pub trait RowIdentity {
    fn row_key(&self) -> String;
}

/// A row the memoizer can fingerprint.
pub trait CacheableRow {
    fn cache_key(&self) -> String;

    /// Current values of `fields`, in order. Missing fields are `Null`.
    fn field_values(&self, fields: &[String]) -> Vec<Value>;
}

impl<T> CacheableRow for T
where
    T: Serialize + RowIdentity,
{
    fn cache_key(&self) -> String {
        self.row_key()
    }

    fn field_values(&self, fields: &[String]) -> Vec<Value> {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        fields
            .iter()
            .map(|field| resolve_path(field, &value).cloned().unwrap_or(Value::Null))
            .collect()
    }
}

#[derive(Clone)]
struct MemoEntry<V> {
    fingerprint: String,
    value: V,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes one derivation over rows.
pub struct Memoizer<V> {
    name: String,
    deps: Vec<String>,
    cache: Cache<String, MemoEntry<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Memoizer<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// `deps` are serialized field names (dotted paths allowed).
    pub fn new(name: impl Into<String>, deps: &[&str], capacity: u64) -> Self {
        Self {
            name: name.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            cache: Cache::builder().max_capacity(capacity.max(1)).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    fn fingerprint<R: CacheableRow + ?Sized>(&self, row: &R) -> String {
        serde_json::to_string(&row.field_values(&self.deps)).unwrap_or_default()
    }

    fn lookup(&self, key: &str, fingerprint: &str) -> Option<V> {
        match self.cache.get(&key.to_string()) {
            Some(entry) if entry.fingerprint == fingerprint => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value)
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn store(&self, key: String, fingerprint: String, value: V) {
        self.cache.insert(key, MemoEntry { fingerprint, value });
    }

    /// Return the cached value for `row`, or compute and cache it.
    pub fn get_or_compute<R, F>(&self, row: &R, compute: F) -> V
    where
        R: CacheableRow + ?Sized,
        F: FnOnce(&R) -> V,
    {
        let key = row.cache_key();
        let fingerprint = self.fingerprint(row);
        if let Some(value) = self.lookup(&key, &fingerprint) {
            return value;
        }
        let value = compute(row);
        self.store(key, fingerprint, value.clone());
        value
    }

    /// Async form of `get_or_compute`.
    pub async fn get_or_compute_async<R, F, Fut>(&self, row: &R, compute: F) -> V
    where
        R: CacheableRow + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let key = row.cache_key();
        let fingerprint = self.fingerprint(row);
        if let Some(value) = self.lookup(&key, &fingerprint) {
            return value;
        }
        let value = compute().await;
        self.store(key, fingerprint, value.clone());
        value
    }

    /// Like `get_or_compute_async`, but errors are returned and not cached,
    /// so the next call retries.
    pub async fn get_or_try_compute_async<R, F, Fut, E>(&self, row: &R, compute: F) -> Result<V, E>
    where
        R: CacheableRow + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = row.cache_key();
        let fingerprint = self.fingerprint(row);
        if let Some(value) = self.lookup(&key, &fingerprint) {
            return Ok(value);
        }
        let value = compute().await?;
        self.store(key, fingerprint, value.clone());
        Ok(value)
    }

    pub fn invalidate(&self, row_key: &str) {
        self.cache.invalidate(&row_key.to_string());
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
