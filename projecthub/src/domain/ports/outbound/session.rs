//! Session repository port (outbound).

use super::StorageError;

/// Holds the name of the logged-in user. Presence means logged in.
pub trait SessionRepository: Send + Sync {
    fn current_user(&self) -> Result<Option<String>, StorageError>;

    fn set_current_user(&self, username: &str) -> Result<(), StorageError>;

    fn clear_current_user(&self) -> Result<(), StorageError>;
}
