//! Form-to-configuration mapper.
//!
//! Reduces the flat set of cleaned field values into a nested
//! [`FrameworkConfig`]: range fields expand into paired min/max keys,
//! parameter fields belonging to non-selected variants are discarded, and
//! the target construction class is decided from the WDM particle mass.

use super::config::{ConfigValue, FrameworkConfig};
use crate::domain::engine::ModelClass;
use crate::domain::forms::{CleanedForm, CleanedValue};
use crate::domain::DomainError;

fn to_config_value(value: &CleanedValue) -> Result<ConfigValue, DomainError> {
    match value {
        CleanedValue::Float(v) => Ok(ConfigValue::Float(*v)),
        CleanedValue::Bool(v) => Ok(ConfigValue::Bool(*v)),
        CleanedValue::Str(v) => Ok(ConfigValue::Str(v.clone())),
        // Pairs must have been expanded into their min/max keys before this
        // point; collapsing one to a scalar would silently lose the bound.
        CleanedValue::Pair(..) => Err(DomainError::internal("unexpanded range value")),
    }
}

/// Map a validated form into `(target class, configuration)`.
pub fn map(form: &CleanedForm) -> Result<(ModelClass, FrameworkConfig), DomainError> {
    let mut config = FrameworkConfig::new();

    for (name, field) in &form.fields {
        // The label is not a framework argument.
        if name == "label" {
            continue;
        }

        // Compound range fields expand into paired scalar keys.
        if let CleanedValue::Pair(lo, hi) = field.value {
            match name.as_str() {
                "lnk_range" => {
                    config.set("lnk_min", ConfigValue::Float(lo));
                    config.set("lnk_max", ConfigValue::Float(hi));
                }
                "logm_range" => {
                    config.set("Mmin", ConfigValue::Float(lo));
                    config.set("Mmax", ConfigValue::Float(hi));
                }
                // Submitted in log10; the framework takes linear scales.
                "log_r_range" => {
                    config.set("rmin", ConfigValue::Float(10f64.powf(lo)));
                    config.set("rmax", ConfigValue::Float(10f64.powf(hi)));
                }
                "log_k_range" => {
                    config.set("hm_logk_min", ConfigValue::Float(lo));
                    config.set("hm_logk_max", ConfigValue::Float(hi));
                }
                other => {
                    return Err(DomainError::internal(format!(
                        "unmapped range field '{other}'"
                    )));
                }
            }
            continue;
        }

        if let Some(provenance) = &field.provenance {
            // Canonical selection rule: the sibling `{kind}_model` field's
            // cleaned value decides which variant is active.
            let selected = form
                .value(&format!("{}_model", provenance.component))
                .and_then(CleanedValue::as_str);

            // Extra fields (no variant tag) always apply.
            if let Some(model) = &provenance.model
                && selected != Some(model.as_str())
            {
                continue;
            }

            config.set_param(
                &provenance.component,
                provenance.paramname.clone(),
                to_config_value(&field.value)?,
            );
            continue;
        }

        // Selector fields: the literal variant "None" means no model at all.
        if name.ends_with("_model") && field.value.as_str() == Some("None") {
            config.set(name.clone(), ConfigValue::Null);
            continue;
        }

        config.set(name.clone(), to_config_value(&field.value)?);
    }

    // Decide the construction class. A zero WDM particle mass means the plain
    // class, for which the WDM keys are meaningless and must not be forwarded.
    let wdm_mass = config.scalar_f64("wdm_mass").unwrap_or(0.0);
    let class = if wdm_mass > 0.0 {
        ModelClass::TracerWdm
    } else {
        for key in ["wdm_mass", "wdm_model", "wdm_params", "alter_model", "alter_params"] {
            config.remove(key);
        }
        ModelClass::Tracer
    };

    Ok((class, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::{build_form, clean, RawFields};
    use indexmap::IndexMap;

    fn submit(extra: &[(&str, &str)]) -> CleanedForm {
        let descriptors = build_form(None, None);
        let mut raw: RawFields = IndexMap::new();
        raw.insert("label".to_string(), "default".to_string());
        for (k, v) in extra {
            raw.insert(k.to_string(), v.to_string());
        }
        clean(&descriptors, &raw, &[], false).unwrap()
    }

    #[test]
    fn test_range_expansion() {
        let form = submit(&[
            ("logm_range", "9 - 16"),
            ("lnk_range", "-10 - 10"),
            ("log_r_range", "-1 - 2"),
            ("log_k_range", "-2 - 1"),
        ]);
        let (_, config) = map(&form).unwrap();

        assert_eq!(config.scalar_f64("Mmin"), Some(9.0));
        assert_eq!(config.scalar_f64("Mmax"), Some(16.0));
        assert_eq!(config.scalar_f64("lnk_min"), Some(-10.0));
        assert_eq!(config.scalar_f64("lnk_max"), Some(10.0));
        // Scale bounds are converted out of log space.
        assert!((config.scalar_f64("rmin").unwrap() - 0.1).abs() < 1e-12);
        assert!((config.scalar_f64("rmax").unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(config.scalar_f64("hm_logk_min"), Some(-2.0));
        assert_eq!(config.scalar_f64("hm_logk_max"), Some(1.0));
        assert!(!config.contains("label"));
        assert!(!config.contains("logm_range"));
    }

    #[test]
    fn test_unselected_variant_params_discarded() {
        let form = submit(&[("bias_model", "Tinker10"), ("bias_Tinker10_use_nu", "true")]);
        let (_, config) = map(&form).unwrap();

        let params = config.params("bias").unwrap();
        assert_eq!(params.get("use_nu"), Some(&ConfigValue::Bool(true)));
        // Parameters of non-selected variants never leak in.
        assert!(!params.contains_key("q"));
        assert!(!params.contains_key("B0"));
    }

    #[test]
    fn test_selected_variant_switch_drops_stale_params() {
        // The Tinker10 field is still submitted (it is pre-rendered), but the
        // selector now points at Mo96.
        let form = submit(&[("bias_model", "Mo96"), ("bias_Tinker10_use_nu", "true")]);
        let (_, config) = map(&form).unwrap();

        match config.params("bias") {
            Some(params) => assert!(!params.contains_key("use_nu")),
            None => {} // Mo96 has no exposed parameters at all
        }
    }

    #[test]
    fn test_extra_fields_always_apply() {
        let form = submit(&[("cosmo_H0", "70.0")]);
        let (_, config) = map(&form).unwrap();
        let params = config.params("cosmo").unwrap();
        assert_eq!(params.get("H0"), Some(&ConfigValue::Float(70.0)));
    }

    #[test]
    fn test_plain_class_strips_wdm_keys() {
        let form = submit(&[("wdm_mass", "0")]);
        let (class, config) = map(&form).unwrap();

        assert_eq!(class, ModelClass::Tracer);
        for key in ["wdm_mass", "wdm_model", "wdm_params", "alter_model", "alter_params"] {
            assert!(!config.contains(key), "{key} should be stripped");
        }
    }

    #[test]
    fn test_wdm_class_keeps_wdm_keys() {
        let form = submit(&[("wdm_mass", "3.0"), ("alter_model", "Lovell14")]);
        let (class, config) = map(&form).unwrap();

        assert_eq!(class, ModelClass::TracerWdm);
        assert_eq!(config.scalar_f64("wdm_mass"), Some(3.0));
        assert_eq!(config.model_choice("wdm"), Some("Viel05"));
        assert_eq!(config.model_choice("alter"), Some("Lovell14"));
    }

    #[test]
    fn test_unexpanded_pair_is_an_internal_error() {
        let result = to_config_value(&CleanedValue::Pair(1.0, 2.0));
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[test]
    fn test_none_selector_maps_to_null() {
        let form = submit(&[("wdm_mass", "3.0")]);
        let (_, config) = map(&form).unwrap();
        // The default recalibration choice is the literal "None" variant.
        assert_eq!(config.get("alter_model"), Some(&ConfigValue::Null));
    }
}
