//! Generic CRUD contract with async primitives and blocking wrappers.
//!
//! Implementors provide the six async primitives. Every `blocking_*` method
//! is provided: it drives the matching primitive to completion on a
//! dedicated current-thread tokio runtime and hands back exactly what the
//! primitive returned. A panic inside the primitive unwinds through the
//! blocking caller unchanged.
//!
//! The blocking wrappers refuse to run from inside an async runtime, since
//! blocking a runtime thread on another runtime would stall both.

use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::errors::{MockDbError, MockDbResult};

/// Something stored under a key of its own.
pub trait Keyed {
    type Key: Ord + Clone + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Errors
///
/// * [`MockDbError::InvalidState`] when called from inside a tokio runtime
/// * [`MockDbError::Runtime`] if the runtime cannot be built
/// * whatever `future` itself resolves to
pub fn run_blocking<T, F>(operation: &str, future: F) -> MockDbResult<T>
where
    F: Future<Output = MockDbResult<T>>,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(MockDbError::InvalidState(format!(
            "blocking {} called from inside an async runtime",
            operation
        )));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let started = Instant::now();
    let result = runtime.block_on(future);
    debug!(
        "Repository: blocking {} finished in {:?} (ok: {})",
        operation,
        started.elapsed(),
        result.is_ok()
    );
    result
}

/// Asynchronous CRUD over entities `E` keyed by `K`.
///
/// # Examples
///
/// ```
/// use mockable_db::databases::memory::MemoryRepository;
/// use mockable_db::traits::repository::{Keyed, Repository};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Note { id: u32, body: String }
///
/// impl Keyed for Note {
///     type Key = u32;
///     fn key(&self) -> u32 { self.id }
/// }
///
/// let repo = MemoryRepository::<Note>::new();
/// repo.blocking_insert(Note { id: 1, body: "hi".into() }).unwrap();
/// assert_eq!(repo.blocking_select(&1).unwrap().unwrap().body, "hi");
/// assert!(repo.blocking_delete(&1).unwrap());
/// assert!(repo.blocking_select_all().unwrap().is_empty());
/// ```
#[async_trait]
pub trait Repository<E, K>: Send + Sync
where
    E: Send + 'static,
    K: Send + Sync + 'static,
{
    /// The entity stored under `key`, if any.
    async fn select(&self, key: &K, token: &CancellationToken) -> MockDbResult<Option<E>>;

    /// The stored entities for `keys`, in the order the keys were given.
    /// Unknown keys are skipped.
    async fn select_many(&self, keys: &[K], token: &CancellationToken) -> MockDbResult<Vec<E>>;

    async fn select_all(&self, token: &CancellationToken) -> MockDbResult<Vec<E>>;

    /// Store a new entity and return it as stored.
    async fn insert(&self, entity: E, token: &CancellationToken) -> MockDbResult<E>;

    async fn update(&self, entity: E, token: &CancellationToken) -> MockDbResult<E>;

    /// Returns whether anything was deleted.
    async fn delete(&self, key: &K, token: &CancellationToken) -> MockDbResult<bool>;

    fn blocking_select(&self, key: &K) -> MockDbResult<Option<E>> {
        let token = CancellationToken::new();
        run_blocking("select", self.select(key, &token))
    }

    fn blocking_select_many(&self, keys: &[K]) -> MockDbResult<Vec<E>> {
        let token = CancellationToken::new();
        run_blocking("select_many", self.select_many(keys, &token))
    }

    fn blocking_select_all(&self) -> MockDbResult<Vec<E>> {
        let token = CancellationToken::new();
        run_blocking("select_all", self.select_all(&token))
    }

    fn blocking_insert(&self, entity: E) -> MockDbResult<E> {
        let token = CancellationToken::new();
        run_blocking("insert", self.insert(entity, &token))
    }

    fn blocking_update(&self, entity: E) -> MockDbResult<E> {
        let token = CancellationToken::new();
        run_blocking("update", self.update(entity, &token))
    }

    fn blocking_delete(&self, key: &K) -> MockDbResult<bool> {
        let token = CancellationToken::new();
        run_blocking("delete", self.delete(key, &token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn run_blocking_returns_the_future_output() {
        assert_eq!(run_blocking("test", async { Ok(5) }).unwrap(), 5);
        assert_matches!(
            run_blocking::<(), _>("test", async { Err(MockDbError::Cancelled) }),
            Err(MockDbError::Cancelled)
        );
    }

    #[tokio::test]
    async fn run_blocking_refuses_nested_runtimes() {
        assert_matches!(
            run_blocking("test", async { Ok(()) }),
            Err(MockDbError::InvalidState(_))
        );
    }

    #[test]
    #[should_panic(expected = "collaborator blew up")]
    fn panics_propagate_unchanged() {
        let _ = run_blocking::<(), _>("test", async {
            if true {
                panic!("collaborator blew up");
            }
            Ok(())
        });
    }
}
