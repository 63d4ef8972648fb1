//! Composition root: the only place that picks concrete storage adapters.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    adapters::outbound::{FileStore, MemoryStore, StoreRepository},
    domain::{
        assignments::BillingSwitchPolicy,
        ports::outbound::{KeyValueStore, StorageError},
        services::{DirectoryService, SessionService, WorkItemService},
    },
};

/// All services, sharing one repository.
pub struct ProjectHub<S> {
    repo: Arc<StoreRepository<S>>,
    pub session: SessionService<StoreRepository<S>>,
    pub directory: DirectoryService<StoreRepository<S>>,
    pub work_items: WorkItemService<StoreRepository<S>>,
}

impl<S: KeyValueStore> ProjectHub<S> {
    pub fn new(store: S, billing_policy: BillingSwitchPolicy) -> Self {
        let repo = Arc::new(StoreRepository::new(store));
        Self {
            session: SessionService::new(repo.clone()),
            directory: DirectoryService::new(repo.clone()),
            work_items: WorkItemService::new(repo.clone()).with_billing_policy(billing_policy),
            repo,
        }
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }
}

impl ProjectHub<FileStore> {
    /// Open (creating if needed) a data directory of JSON documents.
    pub fn open(
        data_dir: impl Into<PathBuf>,
        billing_policy: BillingSwitchPolicy,
    ) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        tracing::debug!(data_dir = %data_dir.display(), "opening data directory");
        Ok(Self::new(FileStore::open(data_dir)?, billing_policy))
    }
}

impl ProjectHub<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), BillingSwitchPolicy::default())
    }
}
