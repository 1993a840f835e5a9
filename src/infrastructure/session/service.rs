//! Session service: the model-collection state machine.
//!
//! All mutations load the whole session, apply the change and store the whole
//! session back, so each operation is atomic with respect to the repository's
//! replace semantics.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use crate::domain::forms::FieldDescriptor;
use crate::domain::framework::{drive, map};
use crate::domain::{
    build_form, clean, DomainError, FormErrors, HaloEngine, ModelClass, RawFields, SessionData,
    SessionId, SessionRepository, StoredModel,
};

/// Label given to the model seeded into every fresh session.
pub const DEFAULT_LABEL: &str = "default";

/// Failure of a create/edit submission: either field-level validation errors
/// to redisplay on the form, or a domain failure.
#[derive(Debug)]
pub enum SubmitError {
    Invalid(FormErrors),
    Domain(DomainError),
}

impl From<DomainError> for SubmitError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<FormErrors> for SubmitError {
    fn from(errors: FormErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Coordinates the session repository and the halo engine.
pub struct SessionService {
    engine: Arc<dyn HaloEngine>,
    repository: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(engine: Arc<dyn HaloEngine>, repository: Arc<dyn SessionRepository>) -> Self {
        Self { engine, repository }
    }

    /// Load the session, seeding the all-defaults model into fresh or emptied
    /// sessions so there is always at least one entry.
    pub async fn load(&self, id: &SessionId) -> Result<SessionData, DomainError> {
        let mut data = self.repository.load(id).await?.unwrap_or_default();
        if data.models.is_empty() {
            data.models
                .insert(DEFAULT_LABEL.to_string(), self.seed_model()?);
            self.repository.store(id, data.clone()).await?;
            info!(session = %id, "seeded fresh session");
        }
        Ok(data)
    }

    /// Create a new model (`edit` unset) or replace an existing one (`edit`
    /// holds the label being edited, which the submission may rename).
    pub async fn submit(
        &self,
        id: &SessionId,
        raw: RawFields,
        edit: Option<&str>,
    ) -> Result<SessionData, SubmitError> {
        self.submit_inner(id, raw, edit, edit).await
    }

    /// Create a new model cloned from `source`, so unchanged derived
    /// quantities carry over instead of being recomputed.
    pub async fn submit_from(
        &self,
        id: &SessionId,
        raw: RawFields,
        source: &str,
    ) -> Result<SessionData, SubmitError> {
        self.submit_inner(id, raw, Some(source), None).await
    }

    async fn submit_inner(
        &self,
        id: &SessionId,
        raw: RawFields,
        base: Option<&str>,
        edit: Option<&str>,
    ) -> Result<SessionData, SubmitError> {
        let mut data = self.load(id).await?;
        let existing = data.labels();

        let descriptors = build_form(None, None);
        let form = clean(&descriptors, &raw, &existing, edit.is_some())?;
        let label = form.label().to_string();

        // An edit may rename, but never onto another model's label.
        if let Some(old_label) = edit
            && label != old_label
            && data.models.contains_key(&label)
        {
            return Err(DomainError::duplicate_label(&label).into());
        }

        let (class, config) = map(&form)?;
        let previous = match base {
            Some(source) => Some(
                &data
                    .models
                    .get(source)
                    .ok_or_else(|| {
                        DomainError::not_found(format!("no model labelled '{source}'"))
                    })?
                    .instance,
            ),
            None => None,
        };
        let instance = drive(self.engine.as_ref(), class, previous, &config)?;
        let stored = StoredModel {
            instance,
            raw_fields: Some(raw),
        };

        match edit {
            Some(old_label) => {
                rename_entry(&mut data.models, old_label, &label, stored);
                if old_label != label
                    && let Some(log) = data.error_log.shift_remove(old_label)
                {
                    data.error_log.insert(label.clone(), log);
                }
                info!(session = %id, from = %old_label, to = %label, "edited model");
            }
            None => {
                data.models.insert(label.clone(), stored);
                info!(session = %id, label = %label, "created model");
            }
        }

        self.repository.store(id, data.clone()).await?;
        Ok(data)
    }

    /// Delete one model. The last remaining model can never be deleted.
    pub async fn delete(&self, id: &SessionId, label: &str) -> Result<SessionData, DomainError> {
        let mut data = self.load(id).await?;

        if data.models.len() <= 1 {
            return Err(DomainError::LastModelProtected);
        }
        if data.models.shift_remove(label).is_none() {
            return Err(DomainError::not_found(format!(
                "no model labelled '{label}'"
            )));
        }
        data.error_log.shift_remove(label);

        self.repository.store(id, data.clone()).await?;
        info!(session = %id, label = %label, "deleted model");
        Ok(data)
    }

    /// Drop everything and reseed the default model.
    pub async fn restart(&self, id: &SessionId) -> Result<SessionData, DomainError> {
        self.repository.remove(id).await?;
        info!(session = %id, "restarted session");
        self.load(id).await
    }

    /// Form descriptors pre-populated for editing one stored model.
    pub async fn edit_form(
        &self,
        id: &SessionId,
        label: &str,
    ) -> Result<Vec<FieldDescriptor>, DomainError> {
        let data = self.load(id).await?;
        let stored = data.models.get(label).ok_or_else(|| {
            DomainError::not_found(format!("no model labelled '{label}'"))
        })?;
        Ok(build_form(stored.raw_fields.as_ref(), Some(label)))
    }

    /// Form descriptors pre-populated from `source` for the clone-into-new
    /// flow. The label initial is suffixed so the submission does not collide
    /// with the source.
    pub async fn clone_form(
        &self,
        id: &SessionId,
        source: &str,
    ) -> Result<Vec<FieldDescriptor>, DomainError> {
        let data = self.load(id).await?;
        let stored = data.models.get(source).ok_or_else(|| {
            DomainError::not_found(format!("no model labelled '{source}'"))
        })?;
        let initial_label = format!("{source}-new");
        Ok(build_form(stored.raw_fields.as_ref(), Some(&initial_label)))
    }

    /// Record accumulated render failures back onto the session.
    pub async fn store_error_log(
        &self,
        id: &SessionId,
        data: SessionData,
    ) -> Result<(), DomainError> {
        self.repository.store(id, data).await
    }

    fn seed_model(&self) -> Result<StoredModel, DomainError> {
        let instance = self
            .engine
            .construct(ModelClass::Tracer, &Default::default())?;
        Ok(StoredModel {
            instance,
            raw_fields: None,
        })
    }
}

/// Replace `old_label`'s entry with `(new_label, stored)` without disturbing
/// the collection order.
fn rename_entry(
    models: &mut IndexMap<String, StoredModel>,
    old_label: &str,
    new_label: &str,
    stored: StoredModel,
) {
    let replaced: IndexMap<String, StoredModel> = models
        .drain(..)
        .map(|(label, existing)| {
            if label == old_label {
                (new_label.to_string(), stored.clone())
            } else {
                (label, existing)
            }
        })
        .collect();
    *models = replaced;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::log_render_error;
    use crate::infrastructure::engine::NativeEngine;
    use crate::infrastructure::session::InMemorySessionRepository;

    fn service() -> SessionService {
        SessionService::new(
            Arc::new(NativeEngine::new()),
            Arc::new(InMemorySessionRepository::new()),
        )
    }

    fn submission(label: &str, extra: &[(&str, &str)]) -> RawFields {
        let mut raw = RawFields::new();
        raw.insert("label".to_string(), label.to_string());
        for (key, value) in extra {
            raw.insert(key.to_string(), value.to_string());
        }
        raw
    }

    #[tokio::test]
    async fn test_fresh_session_seeds_default() {
        let service = service();
        let id = SessionId::generate();

        let data = service.load(&id).await.unwrap();
        assert_eq!(data.labels(), vec!["default"]);
        assert!(data.models["default"].raw_fields.is_none());
    }

    #[tokio::test]
    async fn test_create_appends_model() {
        let service = service();
        let id = SessionId::generate();

        let data = service
            .submit(&id, submission("high-z", &[("z", "2.0")]), None)
            .await
            .unwrap();
        assert_eq!(data.labels(), vec!["default", "high-z"]);
        assert!(data.models["high-z"].raw_fields.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_label_rejected() {
        let service = service();
        let id = SessionId::generate();

        let result = service.submit(&id, submission("default", &[]), None).await;
        assert!(matches!(result, Err(SubmitError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_label_underscores_become_hyphens() {
        let service = service();
        let id = SessionId::generate();

        let data = service
            .submit(&id, submission("my_model_a", &[]), None)
            .await
            .unwrap();
        assert!(data.models.contains_key("my-model-a"));
    }

    #[tokio::test]
    async fn test_edit_renames_in_place() {
        let service = service();
        let id = SessionId::generate();

        service
            .submit(&id, submission("second", &[]), None)
            .await
            .unwrap();
        let data = service
            .submit(&id, submission("renamed", &[]), Some("default"))
            .await
            .unwrap();

        // The renamed entry keeps its original position.
        assert_eq!(data.labels(), vec!["renamed", "second"]);
    }

    #[tokio::test]
    async fn test_edit_cannot_steal_existing_label() {
        let service = service();
        let id = SessionId::generate();

        service
            .submit(&id, submission("second", &[]), None)
            .await
            .unwrap();
        let result = service
            .submit(&id, submission("second", &[]), Some("default"))
            .await;
        assert!(matches!(
            result,
            Err(SubmitError::Domain(DomainError::DuplicateLabel { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_model() {
        let service = service();
        let id = SessionId::generate();

        service
            .submit(&id, submission("second", &[]), None)
            .await
            .unwrap();
        let data = service.delete(&id, "second").await.unwrap();
        assert_eq!(data.labels(), vec!["default"]);
    }

    #[tokio::test]
    async fn test_last_model_protected() {
        let service = service();
        let id = SessionId::generate();

        service.load(&id).await.unwrap();
        let result = service.delete(&id, "default").await;
        assert!(matches!(result, Err(DomainError::LastModelProtected)));
    }

    #[tokio::test]
    async fn test_delete_unknown_label_is_not_found() {
        let service = service();
        let id = SessionId::generate();

        service
            .submit(&id, submission("second", &[]), None)
            .await
            .unwrap();
        let result = service.delete(&id, "nope").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_restart_reseeds_default_only() {
        let service = service();
        let id = SessionId::generate();

        let mut data = service
            .submit(&id, submission("second", &[]), None)
            .await
            .unwrap();
        log_render_error(&mut data.error_log, "second", "dndm", "boom");
        service.store_error_log(&id, data).await.unwrap();

        // Indistinguishable from a brand-new session: seeded default only,
        // accumulated render errors gone.
        let data = service.restart(&id).await.unwrap();
        assert_eq!(data.labels(), vec!["default"]);
        assert!(data.error_log.is_empty());
    }

    #[tokio::test]
    async fn test_submit_from_clones_source_model() {
        let service = service();
        let id = SessionId::generate();

        service
            .submit(&id, submission("high-z", &[("z", "2.0")]), None)
            .await
            .unwrap();
        let data = service
            .submit_from(&id, submission("high-z-copy", &[("z", "2.0")]), "high-z")
            .await
            .unwrap();

        assert_eq!(data.labels(), vec!["default", "high-z", "high-z-copy"]);
        let values = data.models["high-z-copy"].instance.parameter_values();
        assert!(values.iter().any(|(k, v)| k == "z" && v == "2"));
    }

    #[tokio::test]
    async fn test_submit_from_unknown_source_is_not_found() {
        let service = service();
        let id = SessionId::generate();

        service.load(&id).await.unwrap();
        let result = service
            .submit_from(&id, submission("copy", &[]), "nope")
            .await;
        assert!(matches!(
            result,
            Err(SubmitError::Domain(DomainError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_clone_form_suffixes_label_initial() {
        let service = service();
        let id = SessionId::generate();

        service
            .submit(&id, submission("high-z", &[("z", "2.0")]), None)
            .await
            .unwrap();
        let descriptors = service.clone_form(&id, "high-z").await.unwrap();

        let label = descriptors.iter().find(|d| d.name == "label").unwrap();
        assert_eq!(label.initial, "high-z-new");
        let z = descriptors.iter().find(|d| d.name == "z").unwrap();
        assert_eq!(z.initial, "2.0");
    }

    #[tokio::test]
    async fn test_edit_form_prefilled_from_raw_fields() {
        let service = service();
        let id = SessionId::generate();

        service
            .submit(&id, submission("high-z", &[("z", "2.0")]), None)
            .await
            .unwrap();
        let descriptors = service.edit_form(&id, "high-z").await.unwrap();

        let z = descriptors.iter().find(|d| d.name == "z").unwrap();
        assert_eq!(z.initial, "2.0");
        let label = descriptors.iter().find(|d| d.name == "label").unwrap();
        assert_eq!(label.initial, "high-z");
    }

    #[tokio::test]
    async fn test_edit_seeded_default_without_raw_fields() {
        let service = service();
        let id = SessionId::generate();

        service.load(&id).await.unwrap();
        let descriptors = service.edit_form(&id, "default").await.unwrap();
        let label = descriptors.iter().find(|d| d.name == "label").unwrap();
        assert_eq!(label.initial, "default");
    }
}
