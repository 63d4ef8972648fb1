use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::domain::{
    models::{Client, ClientId, Contractor, ContractorId, WorkItem, WorkItemKind},
    ports::outbound::{ClientRepository, ContractorRepository, SkillRepository, WorkItemRepository},
    validation::{ClientDraft, ContractorDraft, ValidationErrors},
    HubError,
};

/// Shown wherever a client reference cannot be resolved.
pub const UNKNOWN_CLIENT: &str = "N/A";

/// Clients, contractors and the skill catalog.
///
/// Deleting a client or contractor is refused while any project or task
/// still refers to it.
pub struct DirectoryService<R> {
    repo: Arc<R>,
}

impl<R> DirectoryService<R>
where
    R: ClientRepository + ContractorRepository + SkillRepository + WorkItemRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ========================================================================
    // Clients
    // ========================================================================

    pub fn list_clients(&self) -> Result<Vec<Client>, HubError> {
        Ok(self.repo.list_clients()?)
    }

    pub fn get_client(&self, id: &ClientId) -> Result<Client, HubError> {
        self.repo
            .get_client(id)?
            .ok_or_else(|| HubError::not_found("client", id))
    }

    /// Display name of a client, or `"N/A"` if it no longer exists.
    pub fn client_name(&self, id: &ClientId) -> Result<String, HubError> {
        Ok(self
            .repo
            .get_client(id)?
            .map(|c| c.full_name())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()))
    }

    #[tracing::instrument(skip(self, draft))]
    pub fn add_client(&self, draft: ClientDraft) -> Result<Client, HubError> {
        let client = draft.into_client(ClientId::generate())?;
        self.repo.upsert_client(&client)?;
        tracing::info!(client_id = %client.id, "client created");
        Ok(client)
    }

    #[tracing::instrument(skip(self, draft))]
    pub fn update_client(&self, id: &ClientId, draft: ClientDraft) -> Result<Client, HubError> {
        self.get_client(id)?;
        let client = draft.into_client(id.clone())?;
        self.repo.upsert_client(&client)?;
        Ok(client)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_client(&self, id: &ClientId) -> Result<(), HubError> {
        self.get_client(id)?;
        let referenced_by = self.referencing_items(|item| &item.client_id == id)?;
        if !referenced_by.is_empty() {
            return Err(HubError::ReferenceInUse {
                entity: "client",
                id: id.to_string(),
                referenced_by,
            });
        }
        self.repo.delete_client(id)?;
        tracing::info!(client_id = %id, "client deleted");
        Ok(())
    }

    // ========================================================================
    // Contractors
    // ========================================================================

    pub fn list_contractors(&self) -> Result<Vec<Contractor>, HubError> {
        Ok(self.repo.list_contractors()?)
    }

    pub fn get_contractor(&self, id: &ContractorId) -> Result<Contractor, HubError> {
        self.repo
            .get_contractor(id)?
            .ok_or_else(|| HubError::not_found("contractor", id))
    }

    #[tracing::instrument(skip(self, draft))]
    pub fn add_contractor(&self, draft: ContractorDraft) -> Result<Contractor, HubError> {
        let contractor = draft.into_contractor(ContractorId::generate())?;
        self.warn_unknown_skills(&contractor)?;
        self.repo.upsert_contractor(&contractor)?;
        tracing::info!(contractor_id = %contractor.id, "contractor created");
        Ok(contractor)
    }

    #[tracing::instrument(skip(self, draft))]
    pub fn update_contractor(
        &self,
        id: &ContractorId,
        draft: ContractorDraft,
    ) -> Result<Contractor, HubError> {
        self.get_contractor(id)?;
        let contractor = draft.into_contractor(id.clone())?;
        self.warn_unknown_skills(&contractor)?;
        self.repo.upsert_contractor(&contractor)?;
        Ok(contractor)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_contractor(&self, id: &ContractorId) -> Result<(), HubError> {
        self.get_contractor(id)?;
        let referenced_by = self.referencing_items(|item| item.references_contractor(id))?;
        if !referenced_by.is_empty() {
            return Err(HubError::ReferenceInUse {
                entity: "contractor",
                id: id.to_string(),
                referenced_by,
            });
        }
        self.repo.delete_contractor(id)?;
        tracing::info!(contractor_id = %id, "contractor deleted");
        Ok(())
    }

    fn warn_unknown_skills(&self, contractor: &Contractor) -> Result<(), HubError> {
        let catalog = self.repo.list_skills()?;
        if catalog.is_empty() {
            return Ok(());
        }
        for skill in contractor.skills.iter().filter(|s| !catalog.contains(s)) {
            tracing::warn!(
                contractor_id = %contractor.id,
                skill = skill.as_str(),
                "skill is not in the catalog"
            );
        }
        Ok(())
    }

    // ========================================================================
    // Skill catalog
    // ========================================================================

    pub fn skills(&self) -> Result<Vec<String>, HubError> {
        Ok(self.repo.list_skills()?)
    }

    pub fn add_skill(&self, skill: &str) -> Result<Vec<String>, HubError> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(ValidationErrors::single("skill", "Please enter a skill").into());
        }
        let mut skills = self.repo.list_skills()?;
        if skills.iter().any(|s| s == skill) {
            return Err(ValidationErrors::single("skill", "This skill already exists").into());
        }
        skills.push(skill.to_string());
        self.repo.save_skills(&skills)?;
        Ok(skills)
    }

    pub fn remove_skill(&self, skill: &str) -> Result<Vec<String>, HubError> {
        let mut skills = self.repo.list_skills()?;
        let before = skills.len();
        skills.retain(|s| s != skill);
        if skills.len() == before {
            return Err(HubError::not_found("skill", skill));
        }
        self.repo.save_skills(&skills)?;
        Ok(skills)
    }

    /// Labels such as `task 'Homepage'` for every work item matching `predicate`.
    fn referencing_items(
        &self,
        predicate: impl Fn(&WorkItem) -> bool,
    ) -> Result<Vec<String>, HubError> {
        let mut labels = Vec::new();
        for kind in WorkItemKind::iter() {
            for item in self.repo.list_work_items(kind)? {
                if predicate(&item) {
                    labels.push(format!("{kind} '{}'", item.name));
                }
            }
        }
        Ok(labels)
    }
}
