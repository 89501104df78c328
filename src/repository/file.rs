//! JSON-file backed pie repository
//!
//! The whole collection is kept in memory and rewritten to disk after every
//! successful mutation. A mutation that cannot be written is not applied.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::pie::{Pie, PieFields, PieFilter, PieId};

use super::errors::RepositoryResult;
use super::memory::PieStore;
use super::PieRepository;

/// Repository persisted as a JSON array of pies.
pub struct FilePieRepository {
    path: PathBuf,
    store: RwLock<PieStore>,
}

impl FilePieRepository {
    /// Open the data file at `path`. A missing file is an empty collection;
    /// a file repeating an id is rejected.
    pub async fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let pies = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<Pie>>(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), count = pies.len(), "loaded pie data file");
        let store = PieStore::load(pies)?;

        Ok(Self {
            path,
            store: RwLock::new(store),
        })
    }

    /// Get the data file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, store: &PieStore) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(store.pies())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `op` to a copy of the store, persist it, then commit it.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut PieStore) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let mut guard = self.store.write().await;
        let mut next = guard.clone();
        let out = op(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl PieRepository for FilePieRepository {
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
        self.mutate(|store| store.insert(fields)).await
    }

    async fn update(&self, id: PieId, fields: PieFields) -> RepositoryResult<Pie> {
        self.mutate(|store| store.update(id, fields)).await
    }

    async fn delete(&self, id: PieId) -> RepositoryResult<()> {
        self.mutate(|store| store.delete(id)).await
    }
}
