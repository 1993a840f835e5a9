//! Session-scoped model collection.
//!
//! A session owns an ordered, label-keyed collection of constructed model
//! instances plus the raw form data that produced them and an error log
//! accumulated while rendering derived quantities. The repository contract is
//! whole-session read/replace; no finer atomicity is assumed, so concurrent
//! tabs mutating the same session race last-write-wins.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::domain::engine::ModelInstance;
use crate::domain::forms::RawFields;
use crate::domain::DomainError;

/// Identifies one browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One stored model: the constructed instance plus the raw submitted field
/// values needed to pre-populate the edit form later. The raw fields are
/// absent only for the eagerly seeded default entry.
#[derive(Clone)]
pub struct StoredModel {
    pub instance: Arc<dyn ModelInstance>,
    pub raw_fields: Option<RawFields>,
}

impl fmt::Debug for StoredModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredModel")
            .field("class", &self.instance.class())
            .field("has_raw_fields", &self.raw_fields.is_some())
            .finish()
    }
}

/// Per-label mapping from error message to the derived-quantity names that
/// triggered it. Accumulates across requests; never fails a request.
pub type ErrorLog = IndexMap<String, IndexMap<String, BTreeSet<String>>>;

/// Record one render failure for `(label, quantity)`.
pub fn log_render_error(log: &mut ErrorLog, label: &str, quantity: &str, message: &str) {
    log.entry(label.to_string())
        .or_default()
        .entry(message.to_string())
        .or_default()
        .insert(quantity.to_string());
}

/// Everything persisted for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub models: IndexMap<String, StoredModel>,
    pub error_log: ErrorLog,
}

impl SessionData {
    pub fn labels(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }
}

/// Whole-session persistence. `store` replaces the entire session state.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError>;

    async fn store(&self, id: &SessionId, data: SessionData) -> Result<(), DomainError>;

    async fn remove(&self, id: &SessionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_round_trip() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_log_render_error_accumulates() {
        let mut log = ErrorLog::default();
        log_render_error(&mut log, "default", "dndm", "boom");
        log_render_error(&mut log, "default", "power", "boom");
        log_render_error(&mut log, "default", "dndm", "other");

        let by_message = log.get("default").unwrap();
        assert_eq!(by_message.get("boom").unwrap().len(), 2);
        assert_eq!(by_message.get("other").unwrap().len(), 1);
    }
}
