// Common test utilities and helpers
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use mockable_db::databases::memory::MemoryRepository;
use mockable_db::databases::mock::{DbType, Parameter, ParameterDirection};
use mockable_db::errors::{MockDbError, MockDbResult};
use mockable_db::table::{Column, Table};
use mockable_db::traits::repository::{Keyed, Repository};
use mockable_db::value::{Value, ValueKind};

/// Key that makes [`EvilRepository`] fail with [`EvilValueError`].
pub const EVIL_VALUE: i32 = -42;

#[derive(Debug, thiserror::Error)]
#[error("the evil value was requested")]
pub struct EvilValueError;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TestEntity {
    pub id: i32,
    pub value: String,
}

impl TestEntity {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            value: format!("Value {id}"),
        }
    }
}

impl Keyed for TestEntity {
    type Key = i32;

    fn key(&self) -> i32 {
        self.id
    }
}

/// A repository that delegates to memory but fails on [`EVIL_VALUE`].
#[derive(Debug)]
pub struct EvilRepository {
    pub inner: MemoryRepository<TestEntity>,
    pub select_all_should_fail: AtomicBool,
}

impl EvilRepository {
    pub fn new() -> Self {
        Self {
            inner: MemoryRepository::new().with_latency(Duration::from_millis(5)),
            select_all_should_fail: AtomicBool::new(false),
        }
    }

    pub fn seeded(ids: impl IntoIterator<Item = i32>) -> Self {
        let repo = Self::new();
        for id in ids {
            repo.blocking_insert(TestEntity::new(id))
                .expect("seeding should succeed");
        }
        repo
    }

    fn evil() -> MockDbError {
        MockDbError::Domain(EvilValueError.into())
    }
}

#[async_trait]
impl Repository<TestEntity, i32> for EvilRepository {
    async fn select(&self, key: &i32, token: &CancellationToken) -> MockDbResult<Option<TestEntity>> {
        if *key == EVIL_VALUE {
            return Err(Self::evil());
        }
        self.inner.select(key, token).await
    }

    async fn select_many(
        &self,
        keys: &[i32],
        token: &CancellationToken,
    ) -> MockDbResult<Vec<TestEntity>> {
        if keys.contains(&EVIL_VALUE) {
            return Err(Self::evil());
        }
        self.inner.select_many(keys, token).await
    }

    async fn select_all(&self, token: &CancellationToken) -> MockDbResult<Vec<TestEntity>> {
        if self.select_all_should_fail.load(Ordering::SeqCst) {
            return Err(Self::evil());
        }
        self.inner.select_all(token).await
    }

    async fn insert(&self, entity: TestEntity, token: &CancellationToken) -> MockDbResult<TestEntity> {
        if entity.id == EVIL_VALUE {
            return Err(Self::evil());
        }
        self.inner.insert(entity, token).await
    }

    async fn update(&self, entity: TestEntity, token: &CancellationToken) -> MockDbResult<TestEntity> {
        if entity.id == EVIL_VALUE {
            panic!("update exploded on the evil value");
        }
        self.inner.update(entity, token).await
    }

    async fn delete(&self, key: &i32, token: &CancellationToken) -> MockDbResult<bool> {
        if *key == EVIL_VALUE {
            return Err(Self::evil());
        }
        self.inner.delete(key, token).await
    }
}

/// Whether `err` is the domain error raised by [`EvilRepository`].
pub fn is_evil(err: &MockDbError) -> bool {
    matches!(err, MockDbError::Domain(e) if e.downcast_ref::<EvilValueError>().is_some())
}

/// Two columns, `Column0: Int32` and `Column1: String`, one row per value.
pub fn int_and_text_table(values: impl IntoIterator<Item = i32>) -> MockDbResult<Table> {
    Table::build(
        values,
        vec![
            Column::new("Column0", ValueKind::Int32),
            Column::new("Column1", ValueKind::String),
        ],
        |i| Some(vec![Value::from(i), Value::from(i.to_string())]),
    )
}

/// A parameter with a random name, type and value.
pub fn random_parameter<R: Rng>(rng: &mut R) -> Parameter {
    let name: String = (0..rng.gen_range(1..12))
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect();

    let (db_type, value) = match rng.gen_range(0..3) {
        0 => (DbType::Int32, Value::from(rng.r#gen::<i32>())),
        1 => (DbType::Boolean, Value::from(rng.r#gen::<bool>())),
        _ => (DbType::String, Value::from(name.to_uppercase())),
    };

    Parameter::builder()
        .name(format!("@{name}"))
        .db_type(db_type)
        .direction(ParameterDirection::Input)
        .size(rng.gen_range(0..256))
        .value(value)
        .build()
}
