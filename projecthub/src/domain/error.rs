use thiserror::Error;

use super::assignments::AssignmentError;
use super::money::AmountOverflow;
use super::ports::outbound::StorageError;
use super::validation::ValidationErrors;

/// Errors returned by the ProjectHub services.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{entity} {id} is still referenced by {}", .referenced_by.join(", "))]
    ReferenceInUse {
        entity: &'static str,
        id: String,
        referenced_by: Vec<String>,
    },
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Overflow(#[from] AmountOverflow),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HubError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
