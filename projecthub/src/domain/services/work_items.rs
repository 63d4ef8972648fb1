use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{
    assignments::{AssignmentError, AssignmentOutcome, BillingSwitchPolicy},
    board::{self, BoardCard, StatusBoard},
    models::{
        BillingType, ContractorId, SubTask, SubTaskId, WorkItem, WorkItemId, WorkItemKind,
        WorkItemStatus,
    },
    ports::outbound::{ClientRepository, ContractorRepository, WorkItemRepository},
    services::UNKNOWN_CLIENT,
    validation::{ValidationErrors, WorkItemDraft, WorkItemFields},
    valuation::{value_work_item, Valuation},
    HubError,
};

/// Shown in place of a parent task that no longer exists.
pub const UNKNOWN_PARENT: &str = "N/A";

/// A work item together with everything derived from it at read time.
#[derive(Debug, Clone)]
pub struct WorkItemView {
    pub item: WorkItem,
    pub client_name: String,
    /// Names of assigned contractors that still exist, in assignment order.
    pub team: Vec<String>,
    pub parent_name: Option<String>,
    pub valuation: Valuation,
}

/// Projects and tasks: lifecycle, contractor assignments, sub-tasks and the board.
///
/// Net value is recomputed from the stored assignments on every read and
/// returned after every mutation; it is never written to storage.
pub struct WorkItemService<R> {
    repo: Arc<R>,
    billing_policy: BillingSwitchPolicy,
}

impl<R> WorkItemService<R>
where
    R: WorkItemRepository + ContractorRepository + ClientRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            billing_policy: BillingSwitchPolicy::default(),
        }
    }

    pub fn with_billing_policy(mut self, policy: BillingSwitchPolicy) -> Self {
        self.billing_policy = policy;
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn get(&self, kind: WorkItemKind, id: &WorkItemId) -> Result<WorkItem, HubError> {
        self.repo
            .get_work_item(kind, id)?
            .ok_or_else(|| HubError::not_found(kind_name(kind), id))
    }

    #[tracing::instrument(skip(self, draft))]
    pub fn create(&self, kind: WorkItemKind, draft: WorkItemDraft) -> Result<WorkItem, HubError> {
        let fields = draft.validate()?;
        self.check_references(kind, None, &fields)?;

        let mut item = WorkItem::new(fields.name, fields.client_id, fields.declared_value)
            .with_status(fields.status.unwrap_or_default());
        item.description = fields.description;
        item.parent_id = fields.parent_id;

        self.repo.upsert_work_item(kind, &item)?;
        tracing::info!(work_item_id = %item.id, %kind, "work item created");
        Ok(item)
    }

    /// Re-submit the form fields of an existing item. Assignments, sub-tasks
    /// and the creation time are kept.
    #[tracing::instrument(skip(self, draft))]
    pub fn edit(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        draft: WorkItemDraft,
    ) -> Result<WorkItem, HubError> {
        let mut item = self.get(kind, id)?;
        let fields = draft.validate()?;
        self.check_references(kind, Some(id), &fields)?;

        item.name = fields.name;
        item.client_id = fields.client_id;
        item.declared_value = fields.declared_value;
        if let Some(status) = fields.status {
            item.status = status;
        }
        item.description = fields.description;
        item.parent_id = fields.parent_id;

        self.value(&item)?;
        self.repo.upsert_work_item(kind, &item)?;
        Ok(item)
    }

    /// Delete an item. A task that is the parent of other tasks is kept.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, kind: WorkItemKind, id: &WorkItemId) -> Result<(), HubError> {
        self.get(kind, id)?;
        if kind == WorkItemKind::Task {
            let children: Vec<String> = self
                .repo
                .list_work_items(kind)?
                .into_iter()
                .filter(|t| t.parent_id.as_ref() == Some(id))
                .map(|t| format!("task '{}'", t.name))
                .collect();
            if !children.is_empty() {
                return Err(HubError::ReferenceInUse {
                    entity: "task",
                    id: id.to_string(),
                    referenced_by: children,
                });
            }
        }
        self.repo.delete_work_item(kind, id)?;
        tracing::info!(work_item_id = %id, %kind, "work item deleted");
        Ok(())
    }

    fn check_references(
        &self,
        kind: WorkItemKind,
        editing: Option<&WorkItemId>,
        fields: &WorkItemFields,
    ) -> Result<(), HubError> {
        let mut errors = ValidationErrors::default();

        if self.repo.get_client(&fields.client_id)?.is_none() {
            errors.push("clientId", format!("Unknown client {}", fields.client_id));
        }

        if let Some(parent_id) = &fields.parent_id {
            if kind == WorkItemKind::Project {
                errors.push("parentTaskId", "Projects cannot have a parent task");
            } else if Some(parent_id) == editing {
                errors.push("parentTaskId", "A task cannot be its own parent");
            } else {
                let tasks = self.repo.list_work_items(WorkItemKind::Task)?;
                match tasks.iter().find(|t| &t.id == parent_id) {
                    None => errors.push("parentTaskId", format!("Unknown task {parent_id}")),
                    Some(parent) if parent.parent_id.is_some() => errors.push(
                        "parentTaskId",
                        "Sub-tasks cannot be nested more than one level",
                    ),
                    Some(_) => {}
                }
                if let Some(id) = editing {
                    if tasks.iter().any(|t| t.parent_id.as_ref() == Some(id)) {
                        errors.push(
                            "parentTaskId",
                            "A task with child tasks cannot itself have a parent",
                        );
                    }
                }
            }
        }

        Ok(errors.into_result(())?)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn valuation(&self, kind: WorkItemKind, id: &WorkItemId) -> Result<Valuation, HubError> {
        let item = self.get(kind, id)?;
        self.value(&item)
    }

    fn value(&self, item: &WorkItem) -> Result<Valuation, HubError> {
        let contractors = self.repo.list_contractors()?;
        Ok(value_work_item(item, &contractors)?)
    }

    pub fn detail(&self, kind: WorkItemKind, id: &WorkItemId) -> Result<WorkItemView, HubError> {
        let item = self.get(kind, id)?;
        let mut views = self.views(kind, vec![item])?;
        views
            .pop()
            .ok_or_else(|| HubError::not_found(kind_name(kind), id))
    }

    /// All items of `kind` in stored order.
    pub fn list(&self, kind: WorkItemKind) -> Result<Vec<WorkItemView>, HubError> {
        let items = self.repo.list_work_items(kind)?;
        self.views(kind, items)
    }

    fn views(&self, kind: WorkItemKind, items: Vec<WorkItem>) -> Result<Vec<WorkItemView>, HubError> {
        let clients = self.repo.list_clients()?;
        let contractors = self.repo.list_contractors()?;
        let tasks = match kind {
            WorkItemKind::Task => self.repo.list_work_items(WorkItemKind::Task)?,
            WorkItemKind::Project => Vec::new(),
        };

        items
            .into_iter()
            .map(|item| -> Result<WorkItemView, HubError> {
                let client_name = clients
                    .iter()
                    .find(|c| c.id == item.client_id)
                    .map(|c| c.full_name())
                    .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
                let team = item
                    .assignments
                    .iter()
                    .filter_map(|a| contractors.iter().find(|c| c.id == a.contractor_id))
                    .map(|c| c.name.clone())
                    .collect();
                let parent_name = item.parent_id.as_ref().map(|pid| {
                    tasks
                        .iter()
                        .find(|t| &t.id == pid)
                        .map(|t| t.name.clone())
                        .unwrap_or_else(|| UNKNOWN_PARENT.to_string())
                });
                let valuation = value_work_item(&item, &contractors)?;
                Ok(WorkItemView {
                    item,
                    client_name,
                    team,
                    parent_name,
                    valuation,
                })
            })
            .collect()
    }

    // ========================================================================
    // Board
    // ========================================================================

    /// Items with no assignments are shown as not yet costed.
    pub fn board(&self, kind: WorkItemKind) -> Result<StatusBoard, HubError> {
        let contractors = self.repo.list_contractors()?;
        let cards = self
            .repo
            .list_work_items(kind)?
            .iter()
            .map(|item| -> Result<BoardCard, HubError> {
                let net_value = if item.assignments.is_empty() {
                    None
                } else {
                    Some(value_work_item(item, &contractors)?.net_value)
                };
                Ok(BoardCard::new(item, net_value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatusBoard::build(cards)?)
    }

    /// Returns the previous status.
    #[tracing::instrument(skip(self))]
    pub fn move_to_status(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        status: WorkItemStatus,
    ) -> Result<WorkItemStatus, HubError> {
        let mut items = self.repo.list_work_items(kind)?;
        let previous = board::move_to_status(&mut items, id, status)
            .ok_or_else(|| HubError::not_found(kind_name(kind), id))?;
        if let Some(item) = items.iter().find(|item| &item.id == id) {
            self.repo.upsert_work_item(kind, item)?;
        }
        tracing::info!(work_item_id = %id, from = %previous, to = %status, "status changed");
        Ok(previous)
    }

    // ========================================================================
    // Contractor assignments
    // ========================================================================

    /// Load, change, and store one item. Nothing is written if `change` fails.
    fn mutate<T>(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        change: impl FnOnce(&mut WorkItem) -> Result<T, HubError>,
    ) -> Result<(WorkItem, T), HubError> {
        let mut item = self.get(kind, id)?;
        let out = change(&mut item)?;
        self.repo.upsert_work_item(kind, &item)?;
        Ok((item, out))
    }

    /// Like [`Self::mutate`], but the changed item is valued before it is
    /// stored, so a change whose cost cannot be computed is never written.
    fn mutate_valued<T>(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        change: impl FnOnce(&mut WorkItem) -> Result<T, HubError>,
    ) -> Result<(T, Valuation), HubError> {
        let mut item = self.get(kind, id)?;
        let out = change(&mut item)?;
        let valuation = self.value(&item)?;
        self.repo.upsert_work_item(kind, &item)?;
        Ok((out, valuation))
    }

    fn require_contractor(&self, contractor_id: &ContractorId) -> Result<(), HubError> {
        match self.repo.get_contractor(contractor_id)? {
            Some(_) => Ok(()),
            None => Err(HubError::not_found("contractor", contractor_id)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn add_contractor(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        contractor_id: &ContractorId,
    ) -> Result<(AssignmentOutcome, Valuation), HubError> {
        self.require_contractor(contractor_id)?;
        let (outcome, valuation) = self.mutate_valued(kind, id, |item| {
            Ok(item.assignments.add_contractor(contractor_id.clone()))
        })?;
        if outcome == AssignmentOutcome::AlreadyAssigned {
            tracing::warn!(%contractor_id, work_item_id = %id, "contractor already assigned");
        }
        Ok((outcome, valuation))
    }

    #[tracing::instrument(skip(self))]
    pub fn remove_contractor(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        contractor_id: &ContractorId,
    ) -> Result<Valuation, HubError> {
        let ((), valuation) = self.mutate_valued(kind, id, |item| {
            if item.assignments.remove_contractor(contractor_id) {
                Ok(())
            } else {
                Err(AssignmentError::NotAssigned(contractor_id.clone()).into())
            }
        })?;
        Ok(valuation)
    }

    #[tracing::instrument(skip(self))]
    pub fn update_hours(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        contractor_id: &ContractorId,
        hours: Decimal,
    ) -> Result<Valuation, HubError> {
        let ((), valuation) = self.mutate_valued(kind, id, |item| {
            if !item.assignments.contains(contractor_id) {
                self.require_contractor(contractor_id)?;
            }
            Ok(item.assignments.update_hours(contractor_id, hours)?)
        })?;
        Ok(valuation)
    }

    #[tracing::instrument(skip(self))]
    pub fn update_billing_type(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        contractor_id: &ContractorId,
        billing_type: BillingType,
    ) -> Result<Valuation, HubError> {
        let policy = self.billing_policy;
        let ((), valuation) = self.mutate_valued(kind, id, |item| {
            Ok(item
                .assignments
                .update_billing_type(contractor_id, billing_type, policy)?)
        })?;
        Ok(valuation)
    }

    #[tracing::instrument(skip(self))]
    pub fn update_fixed_amount(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        contractor_id: &ContractorId,
        amount: Decimal,
    ) -> Result<Valuation, HubError> {
        let ((), valuation) = self.mutate_valued(kind, id, |item| {
            Ok(item.assignments.update_fixed_amount(contractor_id, amount)?)
        })?;
        Ok(valuation)
    }

    // ========================================================================
    // Sub-tasks
    // ========================================================================

    fn check_assignee(&self, contractor_id: Option<&ContractorId>) -> Result<(), HubError> {
        match contractor_id {
            Some(id) => self.require_contractor(id),
            None => Ok(()),
        }
    }

    pub fn add_sub_task(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        name: &str,
        description: Option<String>,
        contractor_id: Option<ContractorId>,
    ) -> Result<SubTask, HubError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationErrors::single("name", "Sub-task name is required").into());
        }
        self.check_assignee(contractor_id.as_ref())?;
        let (_, sub_task) = self.mutate(kind, id, |item| {
            Ok(item.sub_tasks.add(name, description, contractor_id).clone())
        })?;
        Ok(sub_task)
    }

    /// Replace a sub-task by id (rename, re-describe, reassign, or complete it).
    pub fn update_sub_task(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        sub_task: SubTask,
    ) -> Result<(), HubError> {
        if sub_task.name.trim().is_empty() {
            return Err(ValidationErrors::single("name", "Sub-task name is required").into());
        }
        self.check_assignee(sub_task.contractor_id.as_ref())?;
        self.mutate(kind, id, |item| {
            let sub_id = sub_task.id.clone();
            if item.sub_tasks.update(sub_task) {
                Ok(())
            } else {
                Err(HubError::not_found("sub-task", sub_id))
            }
        })?;
        Ok(())
    }

    /// Returns the new completion state.
    pub fn toggle_sub_task(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        sub_task_id: &SubTaskId,
    ) -> Result<bool, HubError> {
        let (_, completed) = self.mutate(kind, id, |item| {
            item.sub_tasks
                .toggle(sub_task_id)
                .ok_or_else(|| HubError::not_found("sub-task", sub_task_id))
        })?;
        Ok(completed)
    }

    pub fn remove_sub_task(
        &self,
        kind: WorkItemKind,
        id: &WorkItemId,
        sub_task_id: &SubTaskId,
    ) -> Result<SubTask, HubError> {
        let (_, removed) = self.mutate(kind, id, |item| {
            item.sub_tasks
                .remove(sub_task_id)
                .ok_or_else(|| HubError::not_found("sub-task", sub_task_id))
        })?;
        Ok(removed)
    }
}

fn kind_name(kind: WorkItemKind) -> &'static str {
    match kind {
        WorkItemKind::Project => "project",
        WorkItemKind::Task => "task",
    }
}
