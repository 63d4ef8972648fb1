//! Work item repository port (outbound).

use crate::domain::models::{WorkItem, WorkItemId, WorkItemKind};

use super::StorageError;

/// Projects and tasks live in separate collections selected by `kind`.
pub trait WorkItemRepository: Send + Sync {
    fn list_work_items(&self, kind: WorkItemKind) -> Result<Vec<WorkItem>, StorageError>;

    fn get_work_item(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
    ) -> Result<Option<WorkItem>, StorageError>;

    /// Insert, or replace the item with the same id in place.
    fn upsert_work_item(&self, kind: WorkItemKind, item: &WorkItem) -> Result<(), StorageError>;

    /// Returns whether an item was removed.
    fn delete_work_item(&self, kind: WorkItemKind, id: &WorkItemId) -> Result<bool, StorageError>;
}
