//! Paginated list cache with neighbour prefetch and per-entity-type invalidation.
//!
//! Pages are stored as JSON together with the time they were cached, so a
//! single cache serves every entity type. An entry is served only while it is
//! neither marked stale nor older than `max_age`; unusable entries are
//! evicted whenever a fresh page is stored.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;

use storefront_core::{Entity, EntityType, Page, PageRequest};

use crate::config::ClientConfig;
use crate::error::ApiResult;

/// Cache key: entity family plus pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub entity: EntityType,
    pub page: u32,
    pub limit: u32,
}

impl CacheKey {
    pub fn new(entity: EntityType, request: PageRequest) -> Self {
        Self {
            entity,
            page: request.page,
            limit: request.limit,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    cached_at: DateTime<Utc>,
    stale: bool,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Bumped on every invalidation; a fetch that started under an older
    /// generation is stored already stale.
    generations: HashMap<EntityType, u64>,
}

impl Inner {
    fn generation(&self, entity: EntityType) -> u64 {
        self.generations.get(&entity).copied().unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct ListCache {
    inner: Mutex<Inner>,
    max_age: Option<Duration>,
}

impl ListCache {
    pub fn new(max_age: Option<Duration>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_age,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.cache_max_age())
    }

    /// Serve `(entity, request)` from cache when fresh, otherwise call `fetch`
    /// and cache its result. Fetch errors are returned and nothing is cached.
    pub async fn query<T, F, Fut>(
        &self,
        entity: EntityType,
        request: PageRequest,
        fetch: F,
    ) -> ApiResult<Page<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(PageRequest) -> Fut,
        Fut: Future<Output = ApiResult<Page<T>>>,
    {
        let key = CacheKey::new(entity, request);
        if let Some(page) = self.fresh(&key) {
            tracing::debug!(entity = %entity, page = key.page, limit = key.limit, "list cache hit");
            return Ok(page);
        }

        tracing::debug!(entity = %entity, page = key.page, limit = key.limit, "list cache miss");
        let generation = self.generation(entity);
        let page = fetch(request).await?;
        self.store(key, &page, generation);
        Ok(page)
    }

    /// Load `request` for `T`'s family and prefetch its neighbours in the
    /// background.
    ///
    /// A request past the last page (e.g. after deleting the only row of the
    /// last page) is moved back to the last page. The returned handle resolves
    /// to the number of prefetched pages; dropping it detaches the task.
    pub async fn load_page<T, F, Fut>(
        self: &Arc<Self>,
        request: &mut PageRequest,
        fetch: F,
    ) -> ApiResult<(Page<T>, JoinHandle<usize>)>
    where
        T: Entity + Serialize + DeserializeOwned + Send + 'static,
        F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<Page<T>>> + Send + 'static,
    {
        let entity = T::ENTITY_TYPE;
        let page = loop {
            let page = self.query(entity, *request, &fetch).await?;
            let last = page.total_pages().max(1);
            if request.page <= last {
                break page;
            }
            tracing::debug!(entity = %entity, page = request.page, last, "page past the end");
            request.page = last;
        };

        let cache = Arc::clone(self);
        let current = page.request();
        let total_pages = page.total_pages();
        let prefetch =
            tokio::spawn(async move { cache.prefetch(entity, current, total_pages, fetch).await });
        Ok((page, prefetch))
    }

    /// Best-effort load of the pages on either side of `current`.
    ///
    /// Page N-1 only when N > 1, page N+1 only when N < `total_pages`; both
    /// are fetched concurrently, pages already fresh in cache are skipped and
    /// failures are swallowed. Returns how many pages were fetched.
    pub async fn prefetch<T, F, Fut>(
        &self,
        entity: EntityType,
        current: PageRequest,
        total_pages: u32,
        fetch: F,
    ) -> usize
    where
        T: Serialize + DeserializeOwned,
        F: Fn(PageRequest) -> Fut,
        Fut: Future<Output = ApiResult<Page<T>>>,
    {
        let next = (current.page < total_pages).then(|| current.next());
        let (next, previous) = tokio::join!(
            self.prefetch_one(entity, next, &fetch),
            self.prefetch_one(entity, current.previous(), &fetch),
        );
        usize::from(next) + usize::from(previous)
    }

    async fn prefetch_one<T, F, Fut>(
        &self,
        entity: EntityType,
        request: Option<PageRequest>,
        fetch: &F,
    ) -> bool
    where
        T: Serialize + DeserializeOwned,
        F: Fn(PageRequest) -> Fut,
        Fut: Future<Output = ApiResult<Page<T>>>,
    {
        let Some(request) = request else {
            return false;
        };
        let key = CacheKey::new(entity, request);
        if self.is_fresh(&key) {
            return false;
        }
        let generation = self.generation(entity);
        match fetch(request).await {
            Ok(page) => {
                self.store(key, &page, generation);
                true
            }
            Err(err) => {
                tracing::debug!(entity = %entity, page = request.page, error = %err, "prefetch failed");
                false
            }
        }
    }

    /// Mark every cached page of `entity` stale. Returns how many were marked.
    pub fn invalidate(&self, entity: EntityType) -> usize {
        let mut inner = self.lock();
        *inner.generations.entry(entity).or_insert(0) += 1;

        let mut marked = 0;
        for (key, entry) in inner.entries.iter_mut() {
            if key.entity == entity {
                entry.stale = true;
                marked += 1;
            }
        }
        tracing::debug!(entity = %entity, pages = marked, "list cache invalidated");
        marked
    }

    /// `Some(stale)` for a cached key, `None` if nothing is cached under it.
    pub fn is_stale(&self, key: &CacheKey) -> Option<bool> {
        self.lock().entries.get(key).map(|entry| entry.stale)
    }

    pub fn is_fresh(&self, key: &CacheKey) -> bool {
        let inner = self.lock();
        inner
            .entries
            .get(key)
            .is_some_and(|entry| self.entry_is_fresh(entry, Utc::now()))
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything (e.g. on sign-out).
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        for generation in inner.generations.values_mut() {
            *generation += 1;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generation(&self, entity: EntityType) -> u64 {
        self.lock().generation(entity)
    }

    fn entry_is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        if entry.stale {
            return false;
        }
        match self.max_age {
            Some(max) => now.signed_duration_since(entry.cached_at) <= max,
            None => true,
        }
    }

    fn fresh<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<Page<T>> {
        let data = {
            let inner = self.lock();
            let entry = inner.entries.get(key)?;
            if !self.entry_is_fresh(entry, Utc::now()) {
                return None;
            }
            entry.data.clone()
        };

        match serde_json::from_value(data) {
            Ok(page) => Some(page),
            Err(err) => {
                tracing::warn!(entity = %key.entity, page = key.page, error = %err, "failed to deserialize cached page");
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: CacheKey, page: &Page<T>, generation: u64) {
        let data = match serde_json::to_value(page) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(entity = %key.entity, page = key.page, error = %err, "failed to serialize page for cache");
                return;
            }
        };

        let now = Utc::now();
        let mut inner = self.lock();
        inner.entries.retain(|_, entry| self.entry_is_fresh(entry, now));
        let stale = inner.generation(key.entity) != generation;
        inner.entries.insert(
            key,
            CacheEntry {
                data,
                cached_at: now,
                stale,
            },
        );
    }

    #[cfg(test)]
    fn backdate(&self, key: &CacheKey, by: Duration) {
        if let Some(entry) = self.lock().entries.get_mut(key) {
            entry.cached_at -= by;
        }
    }
}

impl Default for ListCache {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}
