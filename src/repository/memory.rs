//! In-memory pie repository

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::pie::{Pie, PieFields, PieFilter, PieId};

use super::errors::{RepositoryError, RepositoryResult};
use super::PieRepository;

/// The pie collection plus its id counter.
///
/// Ids come from a monotonic counter so a deleted id is never handed out again.
/// `next_id` is `None` once the counter has passed `u64::MAX`.
#[derive(Debug, Clone)]
pub(super) struct PieStore {
    pies: Vec<Pie>,
    next_id: Option<PieId>,
}

impl PieStore {
    pub(super) fn new(pies: Vec<Pie>) -> Self {
        let next_id = match pies.iter().map(|p| p.id).max() {
            Some(max) => max.next(),
            None => Some(PieId::new(1)),
        };
        Self { pies, next_id }
    }

    /// Build a store from loaded records, rejecting repeated ids.
    pub(super) fn load(pies: Vec<Pie>) -> RepositoryResult<Self> {
        let mut seen = HashSet::with_capacity(pies.len());
        if let Some(dup) = pies.iter().map(|p| p.id).find(|id| !seen.insert(*id)) {
            return Err(RepositoryError::DuplicateId(dup));
        }
        Ok(Self::new(pies))
    }

    pub(super) fn pies(&self) -> &[Pie] {
        &self.pies
    }

    pub(super) fn find(&self, id: PieId) -> Option<&Pie> {
        self.pies.iter().find(|p| p.id == id)
    }

    pub(super) fn search(&self, filter: &PieFilter) -> Vec<Pie> {
        self.pies.iter().filter(|p| filter.matches(p)).cloned().collect()
    }

    pub(super) fn insert(&mut self, fields: PieFields) -> RepositoryResult<Pie> {
        let id = self
            .next_id
            .ok_or_else(|| RepositoryError::Unavailable("id space exhausted".to_string()))?;
        let pie = Pie::new(id, fields);
        self.next_id = id.next();
        self.pies.push(pie.clone());
        Ok(pie)
    }

    pub(super) fn update(&mut self, id: PieId, fields: PieFields) -> RepositoryResult<Pie> {
        let pie = self
            .pies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        pie.fields.merge(fields);
        Ok(pie.clone())
    }

    pub(super) fn delete(&mut self, id: PieId) -> RepositoryResult<()> {
        let idx = self
            .pies
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        self.pies.remove(idx);
        Ok(())
    }
}

/// Repository holding pies in process memory only.
pub struct MemoryPieRepository {
    store: RwLock<PieStore>,
}

impl MemoryPieRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::with_pies(Vec::new())
    }

    /// Create a repository seeded with `pies`
    pub fn with_pies(pies: Vec<Pie>) -> Self {
        Self {
            store: RwLock::new(PieStore::new(pies)),
        }
    }
}

impl Default for MemoryPieRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PieRepository for MemoryPieRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Pie>> {
        Ok(self.store.read().await.pies().to_vec())
    }

    async fn get_by_id(&self, id: PieId) -> RepositoryResult<Option<Pie>> {
        Ok(self.store.read().await.find(id).cloned())
    }

    async fn search(&self, filter: &PieFilter) -> RepositoryResult<Vec<Pie>> {
        Ok(self.store.read().await.search(filter))
    }

    async fn insert(&self, fields: PieFields) -> RepositoryResult<Pie> {
        self.store.write().await.insert(fields)
    }

    async fn update(&self, id: PieId, fields: PieFields) -> RepositoryResult<Pie> {
        self.store.write().await.update(id, fields)
    }

    async fn delete(&self, id: PieId) -> RepositoryResult<()> {
        self.store.write().await.delete(id)
    }
}
