//! Parameter schema registry
//!
//! Holds, for each pluggable component of the halo model (cosmology, transfer
//! function, bias, ...), the list of selectable variants and the default-valued
//! parameters each variant exposes. The tables are static data generated from
//! the upstream library's public parameter defaults; nothing here is
//! introspected at runtime, and the registry is read-only after first access.

mod tables;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::domain::DomainError;

/// Primitive kind of one variant parameter, as exposed on the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamKind {
    Float {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Bool,
    /// Enumerated string; choices are `(value, display label)` pairs.
    Choice { choices: Vec<(String, String)> },
}

/// Default value of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamDefault {
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ParamDefault {
    /// Wire representation used to pre-populate form fields.
    pub fn to_field_value(&self) -> String {
        match self {
            Self::Float(v) => format!("{v}"),
            Self::Bool(v) => format!("{v}"),
            Self::Str(v) => v.clone(),
        }
    }
}

/// One (component, variant, parameter) triple. Computed once from the upstream
/// default-parameter tables; never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct VariantParameterSpec {
    pub name: String,
    pub default: ParamDefault,
    #[serde(flatten)]
    pub kind: ParamKind,
    /// Display-label override; falls back to the parameter name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One named implementation choice for a component.
#[derive(Debug, Clone, Serialize)]
pub struct Variant {
    pub name: String,
    pub label: String,
    pub params: Vec<VariantParameterSpec>,
}

/// One pluggable axis of the halo-model configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSchema {
    /// Stable short name, e.g. `bias` for the `bias_model` key.
    pub kind: String,
    /// Display name shown on the selector field.
    pub label: String,
    pub variants: Vec<Variant>,
    /// Whether the selector allows multiple simultaneous variants.
    pub multi: bool,
    /// Parameter names never exposed as form fields for this component.
    pub ignored_params: Vec<String>,
    /// Fixed fields not tied to any variant (e.g. cosmological constants).
    pub extra_fields: Vec<VariantParameterSpec>,
    /// Variant pre-selected when no prior form data exists.
    pub default_variant: String,
}

impl ComponentSchema {
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

/// The process-wide, immutable registry of component schemas.
#[derive(Debug)]
pub struct SchemaRegistry {
    components: Vec<ComponentSchema>,
}

impl SchemaRegistry {
    pub(crate) fn new(components: Vec<ComponentSchema>) -> Self {
        Self { components }
    }

    /// All components, in form order.
    pub fn components(&self) -> &[ComponentSchema] {
        &self.components
    }

    pub fn component(&self, kind: &str) -> Result<&ComponentSchema, DomainError> {
        self.components
            .iter()
            .find(|c| c.kind == kind)
            .ok_or_else(|| DomainError::internal(format!("unknown component kind '{kind}'")))
    }

    /// Ordered `(name, display label)` pairs for one component's selector.
    pub fn variants_of(&self, kind: &str) -> Result<Vec<(String, String)>, DomainError> {
        Ok(self
            .component(kind)?
            .variants
            .iter()
            .map(|v| (v.name.clone(), v.label.clone()))
            .collect())
    }

    /// Parameter specs of one variant, excluding ignored names.
    pub fn parameters_of(
        &self,
        kind: &str,
        variant: &str,
    ) -> Result<Vec<&VariantParameterSpec>, DomainError> {
        let component = self.component(kind)?;
        let variant = component.variant(variant).ok_or_else(|| {
            DomainError::internal(format!("component '{kind}' has no variant '{variant}'"))
        })?;
        Ok(variant
            .params
            .iter()
            .filter(|p| !component.ignored_params.contains(&p.name))
            .collect())
    }

    pub fn default_variant(&self, kind: &str) -> Result<&str, DomainError> {
        Ok(&self.component(kind)?.default_variant)
    }
}

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(tables::build_registry);

/// Access point for the schema registry. Built on first use, immutable after.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_components() {
        let reg = registry();
        for kind in [
            "cosmo",
            "growth",
            "transfer",
            "hmf",
            "filter",
            "mdef",
            "alter",
            "wdm",
            "bias",
            "halo_concentration",
            "hod",
            "profile",
        ] {
            assert!(reg.component(kind).is_ok(), "missing component {kind}");
        }
    }

    #[test]
    fn test_default_variant_exists_in_variants() {
        let reg = registry();
        for component in reg.components() {
            assert!(
                component.variant(&component.default_variant).is_some(),
                "default variant '{}' missing from '{}'",
                component.default_variant,
                component.kind
            );
        }
    }

    #[test]
    fn test_ignored_params_are_filtered() {
        let reg = registry();
        let params = reg.parameters_of("transfer", "CAMB").unwrap();
        assert!(params.iter().all(|p| p.name != "camb_params"));
    }

    #[test]
    fn test_bias_tinker10_exposes_use_nu() {
        let params = registry().parameters_of("bias", "Tinker10").unwrap();
        assert!(params.iter().any(|p| p.name == "use_nu"));

        let params = registry().parameters_of("bias", "Mo96").unwrap();
        assert!(params.iter().all(|p| p.name != "use_nu"));
    }

    #[test]
    fn test_cosmo_extra_fields() {
        let cosmo = registry().component("cosmo").unwrap();
        let names: Vec<_> = cosmo.extra_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["H0", "Ob0", "Om0"]);
        assert!(cosmo.variants.iter().all(|v| v.params.is_empty()));
    }
}
