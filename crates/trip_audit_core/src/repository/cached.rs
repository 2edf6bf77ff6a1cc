use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use super::DestinationResolver;
use crate::error::RepositoryError;
use crate::trip::DestinationId;

const DEFAULT_CAPACITY: usize = 1_000;

/// LRU cache in front of a destination resolver.
///
/// Keyed by the full destination list of a trip, since that is what route
/// descriptions are built from. Only successful lookups are cached; failures
/// reach the inner resolver again on the next call.
pub struct CachedDestinationResolver<R> {
    inner: R,
    cache: Mutex<LruCache<Vec<DestinationId>, Vec<String>>>,
}

impl<R: DestinationResolver> CachedDestinationResolver<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: DestinationResolver> DestinationResolver for CachedDestinationResolver<R> {
    fn resolve_names(&self, ids: &[DestinationId]) -> Result<Vec<String>, RepositoryError> {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(_) => return self.inner.resolve_names(ids), // poisoned: bypass the cache
        };

        if let Some(names) = cache.get(ids) {
            return Ok(names.clone());
        }

        let names = self.inner.resolve_names(ids)?;
        cache.put(ids.to_vec(), names.clone());
        Ok(names)
    }
}
