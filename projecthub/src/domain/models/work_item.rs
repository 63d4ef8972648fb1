use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::OffsetDateTime;

use super::{ClientId, ContractorId, SubTaskId, WorkItemId};

/// Which collection a work item belongs to.
///
/// Projects and tasks share one record shape; only tasks may point at a
/// parent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WorkItemKind {
    Project,
    Task,
}

impl WorkItemKind {
    /// Storage key of the collection holding this kind of work item.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Task => "tasks",
        }
    }
}

/// Lifecycle stage of a work item, and the column it occupies on the board.
///
/// Any status may be reached from any other.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum WorkItemStatus {
    #[default]
    #[strum(to_string = "Planning")]
    Planning,
    #[serde(rename = "In Progress")]
    #[strum(
        to_string = "In Progress",
        serialize = "in-progress",
        serialize = "inprogress",
        serialize = "in_progress"
    )]
    InProgress,
    #[strum(to_string = "Completed", serialize = "done")]
    Completed,
}

impl WorkItemStatus {
    /// Board columns, in lifecycle order.
    pub const ALL: [WorkItemStatus; 3] = [Self::Planning, Self::InProgress, Self::Completed];
}

/// How a contractor's work on an item is charged.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BillingType {
    #[default]
    Hourly,
    Fixed,
}

/// One contractor bound to one work item, with its billing parameters.
///
/// Only the field selected by `billing_type` contributes to cost; the other
/// is kept so switching back restores the previous figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorAssignment {
    pub contractor_id: ContractorId,
    #[serde(default)]
    pub hours: Decimal,
    #[serde(default)]
    pub billing_type: BillingType,
    #[serde(default)]
    pub fixed_amount: Decimal,
}

impl ContractorAssignment {
    pub fn new(contractor_id: ContractorId) -> Self {
        Self {
            contractor_id,
            hours: Decimal::ZERO,
            billing_type: BillingType::Hourly,
            fixed_amount: Decimal::ZERO,
        }
    }
}

/// The ordered contractor assignments of a work item.
///
/// Holds at most one assignment per contractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignments(pub(crate) Vec<ContractorAssignment>);

/// A checklist entry owned by a single work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: SubTaskId,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor_id: Option<ContractorId>,
}

/// The sub-tasks of a work item, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubTasks(pub(crate) Vec<SubTask>);

/// A project or task.
///
/// Net value is not stored here; it is derived from the assignments on
/// every read. A `netValue` field left by older data is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: WorkItemId,
    pub name: String,
    pub client_id: ClientId,
    #[serde(rename = "value")]
    pub declared_value: Decimal,
    #[serde(default)]
    pub status: WorkItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "parentTaskId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<WorkItemId>,
    #[serde(default, rename = "contractorHours")]
    pub assignments: Assignments,
    #[serde(default)]
    pub sub_tasks: SubTasks,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
}

impl WorkItem {
    pub fn new(name: impl Into<String>, client_id: ClientId, declared_value: Decimal) -> Self {
        Self {
            id: WorkItemId::generate(),
            name: name.into(),
            client_id,
            declared_value,
            status: WorkItemStatus::Planning,
            description: None,
            parent_id: None,
            assignments: Assignments::default(),
            sub_tasks: SubTasks::default(),
            created_at: Some(OffsetDateTime::now_utc()),
        }
    }

    pub fn with_status(mut self, status: WorkItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_parent(mut self, parent_id: WorkItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Whether this item references the contractor anywhere, including sub-task assignees.
    pub fn references_contractor(&self, contractor_id: &ContractorId) -> bool {
        self.assignments.contains(contractor_id)
            || self
                .sub_tasks
                .iter()
                .any(|s| s.contractor_id.as_ref() == Some(contractor_id))
    }
}
