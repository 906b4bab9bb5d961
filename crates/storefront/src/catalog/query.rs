//! Query cache in front of a [`ProductsRepository`].
//!
//! - Concurrent reads of an expired or missing collection share a single
//!   repository call (`moka` `try_get_with`). Errors reach every waiter and
//!   are not cached.
//! - Cached collections expire after the staleness window.
//! - A successful delete bumps a mutation epoch and records the ID. Reads
//!   filter any snapshot whose fetch started before that epoch, so a fetch
//!   that was in flight during the delete cannot bring the product back.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use product_catalog_core::ProductId;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace};

use crate::catalog::cache::{CacheKey, Deletion, Snapshot, deleted_since};
use crate::catalog::{CatalogError, Product, ProductsRepository};

/// Default staleness window.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);

/// Result of a cached read. The error is shared between coalesced callers.
pub type QueryResult<T> = Result<T, Arc<CatalogError>>;

/// How the cached collection is updated after a successful delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidationStrategy {
    /// Remove the deleted product from the cached collection in place.
    #[default]
    Optimistic,
    /// Drop the cached collection; the next read refetches.
    Invalidate,
}

/// Unrecognised strategy name.
#[derive(Debug, Error)]
#[error("unknown invalidation strategy '{0}' (expected 'optimistic' or 'invalidate')")]
pub struct UnknownStrategy(String);

impl FromStr for InvalidationStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Self::Optimistic),
            "invalidate" => Ok(Self::Invalidate),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

// =============================================================================
// ProductQuery
// =============================================================================

/// Cached, coalescing access to the product catalog.
#[derive(Clone)]
pub struct ProductQuery {
    inner: Arc<ProductQueryInner>,
}

struct ProductQueryInner {
    repository: Arc<dyn ProductsRepository>,
    cache: Cache<CacheKey, Snapshot>,
    strategy: InvalidationStrategy,
    /// Incremented by every successful delete.
    epoch: AtomicU64,
    /// Callers currently inside `get_all`.
    readers: AtomicUsize,
    /// Deletions newer than the oldest snapshot a reader may still see.
    deletions: Mutex<Vec<Deletion>>,
}

/// Counts a caller from entering `get_all` until its snapshot is reconciled.
struct ReadGuard<'a>(&'a AtomicUsize);

impl<'a> ReadGuard<'a> {
    fn enter(readers: &'a AtomicUsize) -> Self {
        readers.fetch_add(1, Ordering::AcqRel);
        Self(readers)
    }

    fn is_sole_reader(&self) -> bool {
        self.0.load(Ordering::Acquire) == 1
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl ProductQuery {
    /// Create a query cache over `repository`.
    #[must_use]
    pub fn new(
        repository: Arc<dyn ProductsRepository>,
        stale_time: Duration,
        strategy: InvalidationStrategy,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(stale_time)
            .build();

        Self {
            inner: Arc::new(ProductQueryInner {
                repository,
                cache,
                strategy,
                epoch: AtomicU64::new(0),
                readers: AtomicUsize::new(0),
                deletions: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The configured post-delete strategy.
    #[must_use]
    pub fn strategy(&self) -> InvalidationStrategy {
        self.inner.strategy
    }

    /// Get every product, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the repository error, shared with any caller that was
    /// waiting on the same fetch.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> QueryResult<Arc<[Product]>> {
        let reading = ReadGuard::enter(&self.inner.readers);
        let started = self.inner.epoch.load(Ordering::Acquire);
        let repository = Arc::clone(&self.inner.repository);

        let snapshot = self
            .inner
            .cache
            .try_get_with(CacheKey::Products, async move {
                let products = repository.get_all().await?;
                debug!(count = products.len(), epoch = started, "Cached product collection");
                Ok::<_, CatalogError>(Snapshot::new(products, started))
            })
            .await?;

        Ok(self.reconcile(snapshot, &reading).await)
    }

    /// Look up one product in the cached collection.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying [`Self::get_all`].
    pub async fn find(&self, id: &ProductId) -> QueryResult<Option<Product>> {
        let products = self.get_all().await?;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    /// Delete a product and update the cached collection.
    ///
    /// The cache is only touched after the repository confirms the delete.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the cache is left unchanged.
    #[instrument(skip(self), fields(product_id = %id, strategy = ?self.inner.strategy))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.inner.repository.delete(id).await?;

        let mut log = self.inner.deletions.lock().await;
        let epoch = self.inner.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        log.push(Deletion {
            epoch,
            id: id.clone(),
        });

        match self.inner.strategy {
            InvalidationStrategy::Optimistic => {
                let log = &*log;
                let result = self
                    .inner
                    .cache
                    .entry(CacheKey::Products)
                    .and_compute_with(|entry| {
                        let op = match entry {
                            Some(entry) => {
                                let cached = entry.into_value();
                                let removed = deleted_since(log, cached.epoch);
                                Op::Put(cached.without(&removed, epoch))
                            }
                            None => Op::Nop,
                        };
                        std::future::ready(op)
                    })
                    .await;
                if matches!(result, CompResult::StillNone(_)) {
                    trace!("No cached collection to update");
                }
            }
            InvalidationStrategy::Invalidate => {
                self.inner.cache.invalidate(&CacheKey::Products).await;
            }
        }

        debug!(epoch, "Applied delete to product cache");
        Ok(())
    }

    /// Drop every cached collection.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    /// Filter out products deleted after the snapshot's fetch started.
    async fn reconcile(&self, snapshot: Snapshot, reading: &ReadGuard<'_>) -> Arc<[Product]> {
        let mut log = self.inner.deletions.lock().await;
        let current = self.inner.epoch.load(Ordering::Acquire);

        if snapshot.epoch >= current {
            // No other caller holds a snapshot that is still unreconciled
            if !log.is_empty() && reading.is_sole_reader() {
                trace!(pruned = log.len(), "Pruning deletion log");
                log.clear();
            }
            return snapshot.products;
        }

        let removed = deleted_since(&log, snapshot.epoch);
        trace!(
            snapshot_epoch = snapshot.epoch,
            current,
            removed = removed.len(),
            "Reconciling stale snapshot"
        );
        snapshot.without(&removed, current).products
    }
}
