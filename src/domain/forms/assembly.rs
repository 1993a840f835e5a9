//! Dynamic form assembly.
//!
//! Builds the composite input form by concatenating, in order: the label
//! field, the framework-level flat fields, and per component one selector
//! plus every variant's parameter fields. All variants' parameters are
//! emitted regardless of the current selection so the client can toggle
//! their visibility without a round trip.

use super::field::{FieldDescriptor, FieldKind, RawFields};
use crate::domain::schema::{registry, ParamKind, VariantParameterSpec};

// Defaults mirror the upstream framework's all-parameter defaults.
pub const DEFAULT_LNK_MIN: f64 = -18.420681;
pub const DEFAULT_LNK_MAX: f64 = 9.903488;
pub const DEFAULT_LOGM_MIN: f64 = 10.0;
pub const DEFAULT_LOGM_MAX: f64 = 15.0;

fn float_field(
    name: &str,
    label: &str,
    initial: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Float { min, max })
        .with_initial(format!("{initial}"))
        .required()
}

fn range_field(name: &str, label: &str, min: f64, max: f64, step: f64, lo: f64, hi: f64) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Range { min, max, step })
        .with_initial(format!("{lo} - {hi}"))
        .required()
}

/// Framework-level flat fields (not tied to any component variant).
fn framework_fields() -> Vec<FieldDescriptor> {
    vec![
        float_field("z", "Redshift", 0.0, Some(0.0), Some(1100.0)),
        float_field("n", "n_s (Spectral Index)", 0.9667, Some(-4.0), Some(3.0)),
        float_field("sigma_8", "sigma_8 (RMS Mass Fluctuations)", 0.8159, Some(0.1), None),
        range_field(
            "lnk_range",
            "lnk range",
            -23.03,
            14.51,
            0.1,
            DEFAULT_LNK_MIN,
            DEFAULT_LNK_MAX,
        ),
        float_field("dlnk", "lnk Step Size", 0.05, Some(0.005), Some(0.5)),
        FieldDescriptor::new(
            "takahashi",
            "Use Takahashi (2012) nonlinear P(k)?",
            FieldKind::Bool,
        )
        .with_initial("false"),
        range_field(
            "logm_range",
            "Mass Range (log10)",
            0.0,
            20.0,
            0.1,
            DEFAULT_LOGM_MIN,
            DEFAULT_LOGM_MAX,
        ),
        float_field("dlog10m", "Mass Resolution (log10)", 0.01, Some(0.005), Some(1.0)),
        float_field("delta_c", "delta_c", 1.686, Some(1.0), Some(3.0)),
        float_field("wdm_mass", "WDM Particle Mass (keV)", 0.0, Some(0.0), Some(1000.0)),
        range_field("log_r_range", "Scale Range (log10)", -3.0, 3.0, 0.05, -2.0, 2.1),
        range_field(
            "log_k_range",
            "Halo-Model Wavenumber Range (log10)",
            -3.0,
            3.0,
            0.05,
            -2.0,
            2.0,
        ),
    ]
}

fn param_field(kind: &str, model: Option<&str>, spec: &VariantParameterSpec) -> FieldDescriptor {
    let name = match model {
        Some(model) => format!("{kind}_{model}_{}", spec.name),
        None => format!("{kind}_{}", spec.name),
    };

    let field_kind = match &spec.kind {
        ParamKind::Float { min, max } => FieldKind::Float {
            min: *min,
            max: *max,
        },
        ParamKind::Bool => FieldKind::Bool,
        ParamKind::Choice { choices } => FieldKind::Choice {
            choices: choices.clone(),
        },
    };

    FieldDescriptor::new(
        name,
        spec.label.clone().unwrap_or_else(|| spec.name.clone()),
        field_kind,
    )
    .with_initial(spec.default.to_field_value())
    .with_provenance(kind, model.map(str::to_string), spec.name.clone())
}

/// Build the full ordered field-descriptor list.
///
/// `initial` pre-populates fields from previously submitted raw values;
/// `label_initial` overrides the label field's initial (used for
/// create-from-existing, where the label gets a `-new` suffix).
pub fn build_form(initial: Option<&RawFields>, label_initial: Option<&str>) -> Vec<FieldDescriptor> {
    let mut fields = Vec::new();

    fields.push(
        FieldDescriptor::new("label", "Label", FieldKind::Text { max_length: Some(25) })
            .with_initial(label_initial.unwrap_or("default"))
            .required(),
    );

    fields.extend(framework_fields());

    for component in registry().components() {
        let choices: Vec<(String, String)> = component
            .variants
            .iter()
            .map(|v| (v.name.clone(), v.label.clone()))
            .collect();

        fields.push(
            FieldDescriptor::new(
                format!("{}_model", component.kind),
                component.label.clone(),
                FieldKind::Choice { choices },
            )
            .with_initial(component.default_variant.clone())
            .required(),
        );

        for extra in &component.extra_fields {
            fields.push(param_field(&component.kind, None, extra));
        }

        for variant in &component.variants {
            for spec in &variant.params {
                if component.ignored_params.contains(&spec.name) {
                    continue;
                }
                fields.push(param_field(&component.kind, Some(&variant.name), spec));
            }
        }
    }

    if let Some(raw) = initial {
        for field in &mut fields {
            if field.name == "label" && label_initial.is_some() {
                continue;
            }
            if let Some(value) = raw.get(&field.name) {
                field.initial = value.clone();
            }
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_form_emits_all_variant_params() {
        let fields = build_form(None, None);

        // Selector per component.
        assert!(fields.iter().any(|f| f.name == "bias_model"));
        assert!(fields.iter().any(|f| f.name == "hmf_model"));

        // Parameters of non-default variants are pre-rendered too.
        assert!(fields.iter().any(|f| f.name == "bias_Tinker10_use_nu"));
        assert!(fields.iter().any(|f| f.name == "bias_ST99_q"));
        assert!(fields.iter().any(|f| f.name == "hmf_SMT_a"));
    }

    #[test]
    fn test_param_fields_carry_provenance() {
        let fields = build_form(None, None);
        let field = fields
            .iter()
            .find(|f| f.name == "bias_Tinker10_use_nu")
            .unwrap();
        let prov = field.provenance.as_ref().unwrap();
        assert_eq!(prov.component, "bias");
        assert_eq!(prov.model.as_deref(), Some("Tinker10"));
        assert_eq!(prov.paramname, "use_nu");
    }

    #[test]
    fn test_extra_fields_have_no_variant() {
        let fields = build_form(None, None);
        let field = fields.iter().find(|f| f.name == "cosmo_H0").unwrap();
        let prov = field.provenance.as_ref().unwrap();
        assert_eq!(prov.component, "cosmo");
        assert!(prov.model.is_none());
    }

    #[test]
    fn test_initial_prepopulation() {
        let mut raw = IndexMap::new();
        raw.insert("label".to_string(), "my-model".to_string());
        raw.insert("dlnk".to_string(), "0.1".to_string());

        let fields = build_form(Some(&raw), Some("my-model-new"));

        let label = fields.iter().find(|f| f.name == "label").unwrap();
        assert_eq!(label.initial, "my-model-new");

        let dlnk = fields.iter().find(|f| f.name == "dlnk").unwrap();
        assert_eq!(dlnk.initial, "0.1");
    }
}
