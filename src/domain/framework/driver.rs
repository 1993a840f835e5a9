//! Model construction/clone driver.
//!
//! Decides between constructing a fresh instance and cloning a previous one.
//! Cloning preserves the engine's cached derived quantities for unaffected
//! parts of the pipeline, which is the point of supporting "edit" as distinct
//! from "create". Switching class family always reconstructs.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::config::{ConfigValue, FrameworkConfig};
use crate::domain::engine::{HaloEngine, ModelClass, ModelInstance};
use crate::domain::DomainError;

/// Construct or clone a model instance for `config`.
pub fn drive(
    engine: &dyn HaloEngine,
    class: ModelClass,
    previous: Option<&Arc<dyn ModelInstance>>,
    config: &FrameworkConfig,
) -> Result<Arc<dyn ModelInstance>, DomainError> {
    let Some(previous) = previous else {
        return engine.construct(class, config);
    };

    // Switching class family discards the prior derived-quantity cache.
    if class != previous.class() {
        debug!(?class, "class family changed, constructing fresh instance");
        return engine.construct(class, config);
    }

    // When a component's variant choice changed, its parameter set must be
    // reset before the update is applied. The engine does not do this on
    // plain attribute assignment, so a newly selected variant would otherwise
    // inherit parameter values left over from the previous variant.
    let mut updates = config.clone();
    for (kind, chosen) in config.model_keys() {
        if previous.component_model(&kind).as_deref() != chosen.as_deref() {
            let params_key = format!("{kind}_params");
            if !updates.contains(&params_key) {
                updates.set(params_key.clone(), ConfigValue::Params(IndexMap::new()));
            }
            debug!(component = %kind, "variant changed, resetting parameter set");
        }
    }

    previous.clone_with(&updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::engine::NativeEngine;

    fn config(entries: &[(&str, ConfigValue)]) -> FrameworkConfig {
        let mut config = FrameworkConfig::new();
        for (key, value) in entries {
            config.set(key.to_string(), value.clone());
        }
        config
    }

    fn params(entries: &[(&str, ConfigValue)]) -> ConfigValue {
        let mut map = IndexMap::new();
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        ConfigValue::Params(map)
    }

    #[test]
    fn test_no_previous_constructs_fresh() {
        let engine = NativeEngine::new();
        let instance = drive(&engine, ModelClass::Tracer, None, &config(&[])).unwrap();
        assert_eq!(instance.class(), ModelClass::Tracer);
    }

    #[test]
    fn test_class_switch_reconstructs() {
        let engine = NativeEngine::new();
        let previous = engine.construct(ModelClass::Tracer, &config(&[])).unwrap();

        let wdm_config = config(&[("wdm_mass", ConfigValue::Float(3.0))]);
        let instance = drive(&engine, ModelClass::TracerWdm, Some(&previous), &wdm_config).unwrap();
        assert_eq!(instance.class(), ModelClass::TracerWdm);

        let back = drive(&engine, ModelClass::Tracer, Some(&instance), &config(&[])).unwrap();
        assert_eq!(back.class(), ModelClass::Tracer);
    }

    #[test]
    fn test_same_variant_never_resets_params() {
        let engine = NativeEngine::new();
        let initial = config(&[
            ("bias_model", ConfigValue::Str("Tinker10".to_string())),
            ("bias_params", params(&[("use_nu", ConfigValue::Bool(false))])),
        ]);
        let previous = engine.construct(ModelClass::Tracer, &initial).unwrap();

        // Same variant, an unrelated scalar changed, no bias_params supplied.
        let update = config(&[
            ("bias_model", ConfigValue::Str("Tinker10".to_string())),
            ("z", ConfigValue::Float(1.0)),
        ]);
        let updated = drive(&engine, ModelClass::Tracer, Some(&previous), &update).unwrap();

        let values = updated.parameter_values();
        assert!(values
            .iter()
            .any(|(k, v)| k == "bias_params" && v.contains("use_nu: false")));
    }

    #[test]
    fn test_variant_change_resets_params() {
        let engine = NativeEngine::new();
        let initial = config(&[
            ("bias_model", ConfigValue::Str("Tinker10".to_string())),
            ("bias_params", params(&[("use_nu", ConfigValue::Bool(true))])),
        ]);
        let previous = engine.construct(ModelClass::Tracer, &initial).unwrap();

        // New variant, no bias_params in the update: stale parameters from
        // Tinker10 must not carry over.
        let update = config(&[("bias_model", ConfigValue::Str("Mo96".to_string()))]);
        let updated = drive(&engine, ModelClass::Tracer, Some(&previous), &update).unwrap();

        assert_eq!(updated.component_model("bias").as_deref(), Some("Mo96"));
        let values = updated.parameter_values();
        assert!(
            values
                .iter()
                .all(|(k, v)| k != "bias_params" || !v.contains("use_nu")),
            "stale use_nu leaked across variant switch: {values:?}"
        );
    }
}
