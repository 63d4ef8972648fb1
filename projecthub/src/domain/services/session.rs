use std::sync::Arc;

use crate::domain::{ports::outbound::SessionRepository, validation::ValidationErrors, HubError};

/// Username-only login. There are no passwords; the stored name marks the session.
pub struct SessionService<R> {
    repo: Arc<R>,
}

impl<R: SessionRepository> SessionService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub fn login(&self, username: &str) -> Result<String, HubError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationErrors::single("username", "Username is required").into());
        }
        self.repo.set_current_user(username)?;
        tracing::info!(username, "logged in");
        Ok(username.to_string())
    }

    pub fn logout(&self) -> Result<(), HubError> {
        self.repo.clear_current_user()?;
        Ok(())
    }

    pub fn current_user(&self) -> Result<Option<String>, HubError> {
        Ok(self.repo.current_user()?)
    }

    /// The logged-in username, or [`HubError::NotLoggedIn`].
    pub fn require_user(&self) -> Result<String, HubError> {
        self.current_user()?.ok_or(HubError::NotLoggedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::{MemoryStore, StoreRepository};

    fn service() -> SessionService<StoreRepository<MemoryStore>> {
        SessionService::new(Arc::new(StoreRepository::new(MemoryStore::new())))
    }

    #[test]
    fn login_logout_cycle() {
        let session = service();
        assert!(matches!(session.require_user(), Err(HubError::NotLoggedIn)));

        assert_eq!(session.login("  ada ").unwrap(), "ada");
        assert_eq!(session.require_user().unwrap(), "ada");

        session.logout().unwrap();
        assert_eq!(session.current_user().unwrap(), None);
    }

    #[test]
    fn blank_username_is_rejected() {
        let session = service();
        assert!(matches!(session.login("   "), Err(HubError::Validation(_))));
        assert_eq!(session.current_user().unwrap(), None);
    }
}
