//! In-memory session repository implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, SessionData, SessionId, SessionRepository};

/// In-memory implementation of SessionRepository
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, SessionData>>,
}

impl InMemorySessionRepository {
    /// Creates a new empty repository
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(sessions.get(id).cloned())
    }

    async fn store(&self, id: &SessionId, data: SessionData) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        sessions.insert(*id, data);
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        sessions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_session_is_none() {
        let repository = InMemorySessionRepository::new();
        let id = SessionId::generate();
        assert!(repository.load(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_replaces_whole_session() {
        let repository = InMemorySessionRepository::new();
        let id = SessionId::generate();

        repository.store(&id, SessionData::default()).await.unwrap();
        assert!(repository.load(&id).await.unwrap().is_some());

        repository.remove(&id).await.unwrap();
        assert!(repository.load(&id).await.unwrap().is_none());
    }
}
