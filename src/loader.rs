// src/loader.rs
use crate::{
    cache::TtlCache,
    fetch::{FetchError, Source},
    process::{self, CleanOrders},
    stats::{self, SummaryStats},
};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("processing sheet failed: {0:#}")]
    Pipeline(#[from] anyhow::Error),
}

impl LoadError {
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Fetch(e) => e.kind(),
            LoadError::Pipeline(_) => "pipeline",
        }
    }
}

/// Fetches the order sheet, cleans it and keeps the result for the cache TTL.
pub struct OrderDataLoader {
    source: Source,
    cache: TtlCache<Arc<CleanOrders>>,
}

impl OrderDataLoader {
    pub fn new(source: Source, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The clean record set, fetched and cleaned again only once the cached
    /// one is older than the TTL. Failed loads are not cached.
    #[tracing::instrument(level = "info", skip(self), fields(source = %self.source.id()))]
    pub async fn load(&self) -> Result<Arc<CleanOrders>, LoadError> {
        let key = self.source.id();
        self.cache
            .get_or_try_insert_with(&key, || async {
                let table = self.source.fetch().await?;
                // arrow work stays off the async workers
                let orders = tokio::task::spawn_blocking(move || process::clean_table(&table))
                    .await
                    .map_err(anyhow::Error::from)??;
                info!(records = orders.len(), "loaded orders");
                Ok::<_, LoadError>(Arc::new(orders))
            })
            .await
    }

    pub async fn stats(&self) -> Result<SummaryStats, LoadError> {
        let orders = self.load().await?;
        Ok(stats::aggregate(&orders.batch)?)
    }

    /// Drop the cached set so the next [`load`](Self::load) refetches.
    pub fn invalidate(&self) {
        self.cache.invalidate(&self.source.id());
    }
}
