//! Produto persistence. The service layer only talks to [`ProdutoStore`].

mod memory;
mod postgres;

pub use crate::sql::ProdutoFilter;
pub use memory::MemoryProdutoStore;
pub use postgres::{ensure_database_exists, PgProdutoStore};

use crate::error::AppError;
use crate::model::{Produto, ProdutoFields};
use async_trait::async_trait;

/// Transforms a loaded row into the row to persist. An `Err` aborts the
/// write and nothing is stored.
pub type Apply<'a> = dyn Fn(Produto) -> Result<Produto, AppError> + Send + Sync + 'a;

#[async_trait]
pub trait ProdutoStore: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    /// All rows ordered by id.
    async fn list(&self) -> Result<Vec<Produto>, AppError>;

    /// Persists a new row; the store assigns the id.
    async fn insert(&self, fields: ProdutoFields) -> Result<Produto, AppError>;

    /// Loads the row, runs `apply` and writes the result, as one atomic unit.
    /// `Ok(None)` when no row has this id; `apply` is not called then.
    async fn update_with(&self, id: i64, apply: &Apply<'_>) -> Result<Option<Produto>, AppError>;

    /// Returns the deleted row, or `None` when no row has this id.
    async fn delete(&self, id: i64) -> Result<Option<Produto>, AppError>;

    /// Rows matching the filter, ordered by id.
    async fn search(&self, filter: &ProdutoFilter) -> Result<Vec<Produto>, AppError>;

    /// Atomically deletes every row with stock quantity `<= quant`; returns how many.
    async fn delete_by_max_quantity(&self, quant: i32) -> Result<u64, AppError>;
}
