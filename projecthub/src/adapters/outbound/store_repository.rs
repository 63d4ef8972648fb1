//! Repositories backed by a [`KeyValueStore`], one JSON document per collection.

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::models::{
    Client, ClientId, Contractor, ContractorId, WorkItem, WorkItemId, WorkItemKind,
};
use crate::domain::ports::outbound::{
    ClientRepository, ContractorRepository, KeyValueStore, SessionRepository, SkillRepository,
    StorageError, WorkItemRepository,
};

/// Storage keys, kept compatible with data written by the web app.
pub mod keys {
    pub const CLIENTS: &str = "clients";
    pub const CONTRACTORS: &str = "contractors";
    pub const SKILLS: &str = "availableSkills";
    pub const USER: &str = "user";
}

/// Records that are stored in a collection and matched by id on upsert.
trait Keyed {
    type Id: PartialEq;

    fn key(&self) -> &Self::Id;
}

impl Keyed for Client {
    type Id = ClientId;

    fn key(&self) -> &ClientId {
        &self.id
    }
}

impl Keyed for Contractor {
    type Id = ContractorId;

    fn key(&self) -> &ContractorId {
        &self.id
    }
}

impl Keyed for WorkItem {
    type Id = WorkItemId;

    fn key(&self) -> &WorkItemId {
        &self.id
    }
}

/// Implements every repository port over one key-value store.
///
/// Each mutation reads the whole collection, changes it, and writes it back.
/// Concurrent writers are not coordinated; the last write wins.
#[derive(Debug, Clone)]
pub struct StoreRepository<S> {
    store: S,
}

impl<S: KeyValueStore> StoreRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        Ok(self.read(key)?.unwrap_or_default())
    }

    fn find<T: DeserializeOwned + Keyed>(
        &self,
        key: &str,
        id: &T::Id,
    ) -> Result<Option<T>, StorageError> {
        Ok(self
            .read_collection::<T>(key)?
            .into_iter()
            .find(|record| record.key() == id))
    }

    fn upsert<T: DeserializeOwned + Serialize + Keyed + Clone>(
        &self,
        key: &str,
        record: &T,
    ) -> Result<(), StorageError> {
        let mut records = self.read_collection::<T>(key)?;
        match records.iter_mut().find(|r| r.key() == record.key()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write(key, &records)
    }

    fn delete<T: DeserializeOwned + Serialize + Keyed>(
        &self,
        key: &str,
        id: &T::Id,
    ) -> Result<bool, StorageError> {
        let mut records = self.read_collection::<T>(key)?;
        let before = records.len();
        records.retain(|r| r.key() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write(key, &records)?;
        Ok(true)
    }
}

impl<S: KeyValueStore> ClientRepository for StoreRepository<S> {
    fn list_clients(&self) -> Result<Vec<Client>, StorageError> {
        self.read_collection(keys::CLIENTS)
    }

    fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StorageError> {
        self.find(keys::CLIENTS, id)
    }

    fn upsert_client(&self, client: &Client) -> Result<(), StorageError> {
        self.upsert(keys::CLIENTS, client)
    }

    fn delete_client(&self, id: &ClientId) -> Result<bool, StorageError> {
        self.delete::<Client>(keys::CLIENTS, id)
    }
}

impl<S: KeyValueStore> ContractorRepository for StoreRepository<S> {
    fn list_contractors(&self) -> Result<Vec<Contractor>, StorageError> {
        self.read_collection(keys::CONTRACTORS)
    }

    fn get_contractor(&self, id: &ContractorId) -> Result<Option<Contractor>, StorageError> {
        self.find(keys::CONTRACTORS, id)
    }

    fn upsert_contractor(&self, contractor: &Contractor) -> Result<(), StorageError> {
        self.upsert(keys::CONTRACTORS, contractor)
    }

    fn delete_contractor(&self, id: &ContractorId) -> Result<bool, StorageError> {
        self.delete::<Contractor>(keys::CONTRACTORS, id)
    }
}

impl<S: KeyValueStore> WorkItemRepository for StoreRepository<S> {
    fn list_work_items(&self, kind: WorkItemKind) -> Result<Vec<WorkItem>, StorageError> {
        self.read_collection(kind.collection_key())
    }

    fn get_work_item(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
    ) -> Result<Option<WorkItem>, StorageError> {
        self.find(kind.collection_key(), id)
    }

    fn upsert_work_item(&self, kind: WorkItemKind, item: &WorkItem) -> Result<(), StorageError> {
        self.upsert(kind.collection_key(), item)
    }

    fn delete_work_item(&self, kind: WorkItemKind, id: &WorkItemId) -> Result<bool, StorageError> {
        self.delete::<WorkItem>(kind.collection_key(), id)
    }
}

impl<S: KeyValueStore> SkillRepository for StoreRepository<S> {
    fn list_skills(&self) -> Result<Vec<String>, StorageError> {
        self.read_collection(keys::SKILLS)
    }

    fn save_skills(&self, skills: &[String]) -> Result<(), StorageError> {
        self.write(keys::SKILLS, skills)
    }
}

impl<S: KeyValueStore> SessionRepository for StoreRepository<S> {
    fn current_user(&self) -> Result<Option<String>, StorageError> {
        // The web app stored the bare username, not a JSON string.
        let Some(raw) = self.store.get(keys::USER)? else {
            return Ok(None);
        };
        let user = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        let user = user.trim();
        Ok((!user.is_empty()).then(|| user.to_string()))
    }

    fn set_current_user(&self, username: &str) -> Result<(), StorageError> {
        self.write(keys::USER, username)
    }

    fn clear_current_user(&self) -> Result<(), StorageError> {
        self.store.remove(keys::USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::MemoryStore;
    use rust_decimal_macros::dec;

    fn client(id: &str, first_name: &str) -> Client {
        Client {
            id: ClientId::new(id),
            first_name: first_name.to_string(),
            last_name: "Smith".to_string(),
            company: "Acme".to_string(),
            email: "x@acme.com".to_string(),
            phone: "5551234567".to_string(),
        }
    }

    #[test]
    fn upsert_replaces_in_place_and_keeps_order() {
        let repo = StoreRepository::new(MemoryStore::new());
        repo.upsert_client(&client("1", "Ann")).unwrap();
        repo.upsert_client(&client("2", "Bob")).unwrap();
        repo.upsert_client(&client("1", "Annie")).unwrap();

        let names: Vec<_> = repo
            .list_clients()
            .unwrap()
            .into_iter()
            .map(|c| c.first_name)
            .collect();
        assert_eq!(names, vec!["Annie", "Bob"]);
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let repo = StoreRepository::new(MemoryStore::new());
        repo.upsert_client(&client("1", "Ann")).unwrap();

        assert!(repo.delete_client(&ClientId::new("1")).unwrap());
        assert!(!repo.delete_client(&ClientId::new("1")).unwrap());
        assert!(repo.get_client(&ClientId::new("1")).unwrap().is_none());
    }

    #[test]
    fn projects_and_tasks_are_separate_collections() {
        let store = MemoryStore::new();
        let repo = StoreRepository::new(store.clone());
        let item = WorkItem::new("Launch", ClientId::new("1"), dec!(100));

        repo.upsert_work_item(WorkItemKind::Task, &item).unwrap();
        assert!(repo
            .get_work_item(WorkItemKind::Project, &item.id)
            .unwrap()
            .is_none());
        assert_eq!(
            repo.get_work_item(WorkItemKind::Task, &item.id).unwrap(),
            Some(item)
        );
        assert_eq!(store.keys(), vec!["tasks".to_string()]);
    }

    #[test]
    fn corrupt_collection_is_an_error_not_an_empty_list() {
        let repo = StoreRepository::new(MemoryStore::new().with_entry(keys::CLIENTS, "{oops"));
        assert!(matches!(
            repo.list_clients(),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn session_accepts_bare_legacy_username() {
        let repo = StoreRepository::new(MemoryStore::new().with_entry(keys::USER, "ada"));
        assert_eq!(repo.current_user().unwrap().as_deref(), Some("ada"));

        repo.set_current_user("grace").unwrap();
        assert_eq!(repo.store().get(keys::USER).unwrap().as_deref(), Some("\"grace\""));
        assert_eq!(repo.current_user().unwrap().as_deref(), Some("grace"));

        repo.clear_current_user().unwrap();
        assert_eq!(repo.current_user().unwrap(), None);
    }

    #[test]
    fn skills_round_trip_through_the_store() {
        let repo = StoreRepository::new(MemoryStore::new());
        assert!(repo.list_skills().unwrap().is_empty());

        repo.save_skills(&["Rust".to_string(), "Design".to_string()])
            .unwrap();
        assert_eq!(repo.list_skills().unwrap(), vec!["Rust", "Design"]);
    }

    #[test]
    fn legacy_numeric_ids_are_read_and_rewritten_as_strings() {
        let store = MemoryStore::new()
            .with_entry(
                keys::CONTRACTORS,
                r#"[{"id": 7, "name": "Kim", "email": "kim@example.com",
                     "specialty": "Rust", "rate": "$75/hr"}]"#,
            )
            .with_entry(
                "tasks",
                r#"[{"id": 1700000000000, "name": "Launch", "clientId": 1, "value": 500,
                     "status": "Planning", "parentTaskId": 1600000000000,
                     "contractorHours": [{"contractorId": 7, "hours": 2, "billingType": "hourly"}],
                     "subTasks": [{"id": 1700000000001, "name": "Copy", "contractorId": 7}]}]"#,
            );
        let repo = StoreRepository::new(store.clone());

        let contractor = repo.get_contractor(&ContractorId::new("7")).unwrap().unwrap();
        assert_eq!(contractor.rate, dec!(75));

        let id = WorkItemId::new("1700000000000");
        let mut task = repo.get_work_item(WorkItemKind::Task, &id).unwrap().unwrap();
        assert_eq!(task.client_id, ClientId::new("1"));
        assert_eq!(task.parent_id, Some(WorkItemId::new("1600000000000")));
        assert!(task.references_contractor(&ContractorId::new("7")));

        task.name = "Launch v2".to_string();
        repo.upsert_work_item(WorkItemKind::Task, &task).unwrap();
        let raw = store.get("tasks").unwrap().unwrap();
        assert!(raw.contains(r#""id":"1700000000000""#));
        assert!(raw.contains(r#""contractorId":"7""#));
        assert_eq!(repo.list_work_items(WorkItemKind::Task).unwrap(), vec![task]);
    }
}
