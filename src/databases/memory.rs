//! In-memory storage behind the [`Repository`] contract.
//!
//! Entities live in a `BTreeMap` keyed by [`Keyed::key`], so `select_all`
//! comes back in key order. Every operation checks its cancellation token
//! first and again while waiting on the lock or the simulated latency.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

use crate::errors::{MockDbError, MockDbResult};
use crate::traits::repository::{Keyed, Repository};

pub struct MemoryRepository<E: Keyed> {
    entries: RwLock<BTreeMap<E::Key, E>>,
    latency: Duration,
}

impl<E: Keyed> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for MemoryRepository<E>
where
    E: Keyed,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl<E: Keyed> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            latency: Duration::ZERO,
        }
    }

    /// Delay every operation by `latency`, as a slow backend would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self, token: &CancellationToken) -> MockDbResult<()> {
        if token.is_cancelled() {
            return Err(MockDbError::Cancelled);
        }
        if self.latency.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(MockDbError::Cancelled),
            _ = tokio::time::sleep(self.latency) => Ok(()),
        }
    }

    async fn read(
        &self,
        token: &CancellationToken,
    ) -> MockDbResult<RwLockReadGuard<'_, BTreeMap<E::Key, E>>> {
        self.pause(token).await?;
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(MockDbError::Cancelled),
            guard = self.entries.read() => Ok(guard),
        }
    }

    async fn write(
        &self,
        token: &CancellationToken,
    ) -> MockDbResult<RwLockWriteGuard<'_, BTreeMap<E::Key, E>>> {
        self.pause(token).await?;
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(MockDbError::Cancelled),
            guard = self.entries.write() => Ok(guard),
        }
    }
}

impl<E: Keyed> FromIterator<E> for MemoryRepository<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let entries = iter.into_iter().map(|e| (e.key(), e)).collect();
        Self {
            entries: RwLock::new(entries),
            latency: Duration::ZERO,
        }
    }
}

#[async_trait]
impl<E> Repository<E, E::Key> for MemoryRepository<E>
where
    E: Keyed + Clone + Send + Sync + 'static,
{
    async fn select(&self, key: &E::Key, token: &CancellationToken) -> MockDbResult<Option<E>> {
        Ok(self.read(token).await?.get(key).cloned())
    }

    async fn select_many(
        &self,
        keys: &[E::Key],
        token: &CancellationToken,
    ) -> MockDbResult<Vec<E>> {
        let entries = self.read(token).await?;
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).cloned())
            .collect())
    }

    async fn select_all(&self, token: &CancellationToken) -> MockDbResult<Vec<E>> {
        Ok(self.read(token).await?.values().cloned().collect())
    }

    async fn insert(&self, entity: E, token: &CancellationToken) -> MockDbResult<E> {
        let mut entries = self.write(token).await?;
        let key = entity.key();
        if entries.contains_key(&key) {
            return Err(MockDbError::Duplicate(
                "an entity with this key is already stored".to_string(),
            ));
        }
        entries.insert(key, entity.clone());
        debug!("MemoryRepository: inserted, {} entities stored", entries.len());
        Ok(entity)
    }

    /// Inserts the entity when its key is not stored yet.
    async fn update(&self, entity: E, token: &CancellationToken) -> MockDbResult<E> {
        let mut entries = self.write(token).await?;
        entries.insert(entity.key(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key, token: &CancellationToken) -> MockDbResult<bool> {
        let removed = self.write(token).await?.remove(key).is_some();
        debug!("MemoryRepository: delete removed an entity: {}", removed);
        Ok(removed)
    }
}
