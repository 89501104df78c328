//! # Pie Repository
//!
//! Data access for pies. Handlers only see the [`PieRepository`] trait; the
//! in-memory and JSON-file implementations live alongside it.

mod errors;
mod file;
mod memory;

pub use errors::{RepositoryError, RepositoryResult};
pub use file::FilePieRepository;
pub use memory::MemoryPieRepository;

use async_trait::async_trait;

use crate::pie::{Pie, PieFields, PieFilter, PieId};

/// CRUD operations over the pie collection.
///
/// Every operation completes with either its data or a [`RepositoryError`].
#[async_trait]
pub trait PieRepository: Send + Sync {
    /// All pies, in storage order
    async fn get_all(&self) -> RepositoryResult<Vec<Pie>>;

    /// A single pie, or `None` when the id is unknown
    async fn get_by_id(&self, id: PieId) -> RepositoryResult<Option<Pie>>;

    /// Pies matching the filter (possibly none)
    async fn search(&self, filter: &PieFilter) -> RepositoryResult<Vec<Pie>>;

    /// Store a new pie under a freshly assigned id
    async fn insert(&self, fields: PieFields) -> RepositoryResult<Pie>;

    /// Merge `fields` into the pie at `id` and return the result
    async fn update(&self, id: PieId, fields: PieFields) -> RepositoryResult<Pie>;

    /// Remove the pie at `id`
    async fn delete(&self, id: PieId) -> RepositoryResult<()>;
}
