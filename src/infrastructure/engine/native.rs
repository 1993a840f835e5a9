//! In-process engine: resolves a partial configuration against the schema
//! registry's defaults and serves derived quantities from the reference-curve
//! tables, with per-instance caching.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use tracing::debug;

use super::quantities::{self, EffectiveParams};
use crate::domain::engine::{AxisKind, HaloEngine, ModelClass, ModelInstance};
use crate::domain::framework::{ConfigValue, FrameworkConfig};
use crate::domain::render::KEYMAP;
use crate::domain::schema::{self, ParamDefault, VariantParameterSpec};
use crate::domain::DomainError;

/// Engine constructing [`NativeInstance`]s.
#[derive(Debug, Default)]
pub struct NativeEngine;

impl NativeEngine {
    pub fn new() -> Self {
        Self
    }
}

impl HaloEngine for NativeEngine {
    fn construct(
        &self,
        class: ModelClass,
        config: &FrameworkConfig,
    ) -> Result<Arc<dyn ModelInstance>, DomainError> {
        let resolved = resolve_config(class, config)?;
        let effective = effective_params(class, &resolved)?;
        debug!(?class, keys = resolved.0.len(), "constructed model instance");
        Ok(Arc::new(NativeInstance {
            class,
            config: resolved,
            effective,
            cache: Mutex::new(HashMap::new()),
        }))
    }
}

/// One constructed model: the fully resolved configuration plus a cache of
/// derived quantities computed so far.
pub struct NativeInstance {
    class: ModelClass,
    config: FrameworkConfig,
    effective: EffectiveParams,
    cache: Mutex<HashMap<String, Option<Vec<f64>>>>,
}

impl ModelInstance for NativeInstance {
    fn class(&self) -> ModelClass {
        self.class
    }

    fn grid(&self, axis: AxisKind) -> Result<Vec<f64>, DomainError> {
        Ok(quantities::grid(axis, &self.effective))
    }

    fn quantity(&self, name: &str) -> Result<Option<Vec<f64>>, DomainError> {
        let meta = KEYMAP
            .get(name)
            .ok_or_else(|| DomainError::not_found(format!("unknown quantity '{name}'")))?;

        let mut cache = self
            .cache
            .lock()
            .map_err(|_| DomainError::internal("quantity cache poisoned"))?;
        if let Some(cached) = cache.get(name) {
            return Ok(cached.clone());
        }

        let x = quantities::grid(meta.axis, &self.effective);
        let y = quantities::compute(name, &x, &self.effective);
        cache.insert(name.to_string(), y.clone());
        Ok(y)
    }

    fn component_model(&self, kind: &str) -> Option<String> {
        self.config.model_choice(kind).map(str::to_string)
    }

    fn parameter_values(&self) -> Vec<(String, String)> {
        self.config
            .iter()
            .map(|(key, value)| (key.clone(), value.display()))
            .collect()
    }

    fn clone_with(
        &self,
        updates: &FrameworkConfig,
    ) -> Result<Arc<dyn ModelInstance>, DomainError> {
        let mut config = self.config.clone();

        // Variant choices land first so parameter replacement below re-seeds
        // from the right variant's defaults.
        for (key, value) in updates.iter() {
            if key.ends_with("_model") {
                config.set(key.clone(), value.clone());
            }
        }

        // A `{kind}_params` map in the update replaces the component's
        // parameter set wholesale: defaults of the chosen variant overlaid
        // with the supplied values. Values from a previously chosen variant
        // never survive this.
        for (key, value) in updates.iter() {
            if let Some(kind) = key.strip_suffix("_params") {
                let mut params = match config.model_choice(kind) {
                    Some(variant) => variant_defaults(kind, variant)?,
                    None => IndexMap::new(),
                };
                if let Some(overlay) = value.as_params() {
                    for (name, value) in overlay {
                        params.insert(name.clone(), value.clone());
                    }
                }
                config.set(key.clone(), ConfigValue::Params(params));
            }
        }

        for (key, value) in updates.iter() {
            if !key.ends_with("_model") && !key.ends_with("_params") {
                config.set(key.clone(), value.clone());
            }
        }

        let effective = effective_params(self.class, &config)?;

        // Derived quantities are pure functions of their axis grid and the
        // physics scalars, so entries whose inputs the update left untouched
        // carry over; everything else recomputes lazily.
        let cache = {
            let cache = self
                .cache
                .lock()
                .map_err(|_| DomainError::internal("quantity cache poisoned"))?;
            carried_entries(&self.effective, &effective, &cache)
        };

        Ok(Arc::new(NativeInstance {
            class: self.class,
            config,
            effective,
            cache: Mutex::new(cache),
        }))
    }
}

/// Cache entries still valid under `new`: the physics scalars must match and
/// the entry's own axis grid must be unchanged. Other axes' grid bounds never
/// feed a quantity's values, so e.g. a pure `hm_logk_*` change keeps every
/// mass-axis entry.
fn carried_entries(
    old: &EffectiveParams,
    new: &EffectiveParams,
    cache: &HashMap<String, Option<Vec<f64>>>,
) -> HashMap<String, Option<Vec<f64>>> {
    if !new.same_physics(old) {
        return HashMap::new();
    }
    cache
        .iter()
        .filter(|(name, _)| {
            KEYMAP
                .get(name.as_str())
                .is_some_and(|meta| new.grid_inputs(meta.axis) == old.grid_inputs(meta.axis))
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn default_value(default: &ParamDefault) -> ConfigValue {
    match default {
        ParamDefault::Float(v) => ConfigValue::Float(*v),
        ParamDefault::Bool(v) => ConfigValue::Bool(*v),
        ParamDefault::Str(v) => ConfigValue::Str(v.clone()),
    }
}

fn spec_defaults(specs: &[&VariantParameterSpec]) -> IndexMap<String, ConfigValue> {
    specs
        .iter()
        .map(|spec| (spec.name.clone(), default_value(&spec.default)))
        .collect()
}

/// Default parameter set of one component variant: fixed extra fields plus
/// the variant's own exposed parameters.
fn variant_defaults(
    kind: &str,
    variant: &str,
) -> Result<IndexMap<String, ConfigValue>, DomainError> {
    let component = schema::registry().component(kind)?;
    if component.variant(variant).is_none() {
        return Err(DomainError::construction(format!(
            "component '{kind}' has no variant '{variant}'"
        )));
    }

    let mut params: IndexMap<String, ConfigValue> = component
        .extra_fields
        .iter()
        .map(|spec| (spec.name.clone(), default_value(&spec.default)))
        .collect();
    params.extend(spec_defaults(&schema::registry().parameters_of(kind, variant)?));
    Ok(params)
}

const SCALAR_DEFAULTS: &[(&str, f64)] = &[
    ("z", 0.0),
    ("n", 0.9667),
    ("sigma_8", 0.8159),
    ("lnk_min", -18.420681),
    ("lnk_max", 9.903488),
    ("dlnk", 0.05),
    ("Mmin", 10.0),
    ("Mmax", 15.0),
    ("dlog10m", 0.01),
    ("delta_c", 1.686),
    ("rmin", 0.01),
    ("rmax", 125.89254117941675),
    ("hm_logk_min", -2.0),
    ("hm_logk_max", 2.0),
];

/// Fill in every key the incoming configuration omits: framework scalars, a
/// variant choice per component and that variant's default parameters.
fn resolve_config(
    class: ModelClass,
    overrides: &FrameworkConfig,
) -> Result<FrameworkConfig, DomainError> {
    let mut config = FrameworkConfig::new();

    for (key, value) in SCALAR_DEFAULTS {
        config.set(*key, ConfigValue::Float(*value));
    }
    config.set("takahashi", ConfigValue::Bool(false));
    if class == ModelClass::TracerWdm {
        config.set("wdm_mass", ConfigValue::Float(3.0));
    }

    for (key, value) in overrides.iter() {
        if !key.ends_with("_model") && !key.ends_with("_params") {
            config.set(key.clone(), value.clone());
        }
    }

    for component in schema::registry().components() {
        let kind = component.kind.as_str();
        // The WDM-only components are meaningless for the plain class.
        if class == ModelClass::Tracer && (kind == "wdm" || kind == "alter") {
            continue;
        }

        let model_key = format!("{kind}_model");
        let chosen = match overrides.get(&model_key) {
            Some(ConfigValue::Null) => None,
            Some(ConfigValue::Str(variant)) => Some(variant.clone()),
            Some(other) => {
                return Err(DomainError::construction(format!(
                    "'{model_key}' must be a variant name, got {}",
                    other.display()
                )));
            }
            None if component.default_variant == "None" => None,
            None => Some(component.default_variant.clone()),
        };

        let Some(variant) = chosen else {
            config.set(model_key, ConfigValue::Null);
            continue;
        };

        let mut params = variant_defaults(kind, &variant)?;
        if let Some(overlay) = overrides.params(kind) {
            for (name, value) in overlay {
                params.insert(name.clone(), value.clone());
            }
        }
        config.set(model_key, ConfigValue::Str(variant));
        config.set(format!("{kind}_params"), ConfigValue::Params(params));
    }

    Ok(config)
}

fn required_scalar(config: &FrameworkConfig, key: &str) -> Result<f64, DomainError> {
    let value = config
        .scalar_f64(key)
        .ok_or_else(|| DomainError::construction(format!("'{key}' must be a number")))?;
    if !value.is_finite() {
        return Err(DomainError::construction(format!("'{key}' must be finite")));
    }
    Ok(value)
}

fn param_f64(params: Option<&IndexMap<String, ConfigValue>>, name: &str, fallback: f64) -> f64 {
    params
        .and_then(|map| map.get(name))
        .and_then(ConfigValue::as_f64)
        .unwrap_or(fallback)
}

/// Validate the resolved configuration's grids and extract the scalars the
/// curve tables consume.
fn effective_params(
    class: ModelClass,
    config: &FrameworkConfig,
) -> Result<EffectiveParams, DomainError> {
    let mmin = required_scalar(config, "Mmin")?;
    let mmax = required_scalar(config, "Mmax")?;
    let dlog10m = required_scalar(config, "dlog10m")?;
    if mmin >= mmax || dlog10m <= 0.0 {
        return Err(DomainError::construction(
            "mass grid requires Mmin < Mmax and dlog10m > 0",
        ));
    }

    let lnk_min = required_scalar(config, "lnk_min")?;
    let lnk_max = required_scalar(config, "lnk_max")?;
    let dlnk = required_scalar(config, "dlnk")?;
    if lnk_min >= lnk_max || dlnk <= 0.0 {
        return Err(DomainError::construction(
            "wavenumber grid requires lnk_min < lnk_max and dlnk > 0",
        ));
    }

    let rmin = required_scalar(config, "rmin")?;
    let rmax = required_scalar(config, "rmax")?;
    if rmin <= 0.0 || rmin >= rmax {
        return Err(DomainError::construction(
            "scale grid requires 0 < rmin < rmax",
        ));
    }

    let hm_logk_min = required_scalar(config, "hm_logk_min")?;
    let hm_logk_max = required_scalar(config, "hm_logk_max")?;
    if hm_logk_min >= hm_logk_max {
        return Err(DomainError::construction(
            "halo-model wavenumber grid requires hm_logk_min < hm_logk_max",
        ));
    }

    let cosmo = config.params("cosmo");
    let hod = config.params("hod");
    let conc = config.params("halo_concentration");

    let hod_central = hod
        .and_then(|map| map.get("central"))
        .map(|v| matches!(v, ConfigValue::Bool(true)))
        .unwrap_or(true);

    Ok(EffectiveParams {
        z: required_scalar(config, "z")?,
        n: required_scalar(config, "n")?,
        sigma_8: required_scalar(config, "sigma_8")?,
        delta_c: required_scalar(config, "delta_c")?,
        om0: param_f64(cosmo, "Om0", 0.3075),
        h0: param_f64(cosmo, "H0", 67.74),
        takahashi: matches!(config.get("takahashi"), Some(ConfigValue::Bool(true))),
        mmin,
        mmax,
        dlog10m,
        lnk_min,
        lnk_max,
        dlnk,
        rmin,
        rmax,
        hm_logk_min,
        hm_logk_max,
        wdm_mass: match class {
            ModelClass::Tracer => 0.0,
            ModelClass::TracerWdm => required_scalar(config, "wdm_mass")?,
        },
        hod_m_min: param_f64(hod, "M_min", 12.6311),
        hod_m_1: param_f64(hod, "M_1", 13.0389),
        hod_alpha: param_f64(hod, "alpha", 1.049),
        hod_central,
        conc_a: param_f64(conc, "a", 6.71),
        conc_b: param_f64(conc, "b", -0.091),
        unity_bias: config.model_choice("bias") == Some("UnityBias"),
    })
}
