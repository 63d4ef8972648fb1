//! Client, contractor and skill repository ports (outbound).

use crate::domain::models::{Client, ClientId, Contractor, ContractorId};

use super::StorageError;

pub trait ClientRepository: Send + Sync {
    fn list_clients(&self) -> Result<Vec<Client>, StorageError>;

    fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StorageError>;

    /// Insert, or replace the client with the same id in place.
    fn upsert_client(&self, client: &Client) -> Result<(), StorageError>;

    /// Returns whether a client was removed.
    fn delete_client(&self, id: &ClientId) -> Result<bool, StorageError>;
}

pub trait ContractorRepository: Send + Sync {
    fn list_contractors(&self) -> Result<Vec<Contractor>, StorageError>;

    fn get_contractor(&self, id: &ContractorId) -> Result<Option<Contractor>, StorageError>;

    /// Insert, or replace the contractor with the same id in place.
    fn upsert_contractor(&self, contractor: &Contractor) -> Result<(), StorageError>;

    /// Returns whether a contractor was removed.
    fn delete_contractor(&self, id: &ContractorId) -> Result<bool, StorageError>;
}

/// The catalog of skill tags offered when creating contractors.
pub trait SkillRepository: Send + Sync {
    fn list_skills(&self) -> Result<Vec<String>, StorageError>;

    fn save_skills(&self, skills: &[String]) -> Result<(), StorageError>;
}
