use crate::{
    config::StoreConfig,
    data::student::{NewStudent, Student},
    error::RegistrarResult,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

/// CRUD over the student collection.
///
/// Implementations must enforce email uniqueness atomically: of two concurrent
/// `create`s with the same email, exactly one succeeds and the other gets
/// [`RegistrarError::DuplicateEmail`](crate::error::RegistrarError::DuplicateEmail).
#[async_trait]
pub trait StudentStore: Send + Sync + Debug {
    async fn create(&self, student: NewStudent) -> RegistrarResult<Student>;
    ///newest first
    async fn list(&self) -> RegistrarResult<Vec<Student>>;
    async fn get_by_id(&self, id: Uuid) -> RegistrarResult<Option<Student>>;
    ///returns whether anything was deleted
    async fn delete_by_id(&self, id: Uuid) -> RegistrarResult<bool>;
    async fn close(&self);
}

pub async fn open(config: &StoreConfig) -> RegistrarResult<Arc<dyn StudentStore>> {
    Ok(match config {
        StoreConfig::Postgres(db_config) => {
            info!("Opening PostgreSQL student store");
            Arc::new(postgres::PostgresStudentStore::open(db_config).await?)
        }
        StoreConfig::Memory => {
            warn!("Using the in-memory student store, records will not survive a restart");
            Arc::new(memory::MemoryStudentStore::default())
        }
    })
}
