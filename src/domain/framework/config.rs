//! Nested framework configuration built from a cleaned form submission.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One configuration value: a top-level scalar, an explicit null (e.g. a
/// deselected WDM recalibration), or a `{kind}_params` sub-mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
    Params(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_params(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match self {
            Self::Params(map) => Some(map),
            _ => None,
        }
    }

    /// Flat display form, used for parameter serialization.
    pub fn display(&self) -> String {
        match self {
            Self::Float(v) => format!("{v}"),
            Self::Bool(v) => format!("{v}"),
            Self::Str(v) => v.clone(),
            Self::Null => "None".to_string(),
            Self::Params(map) => {
                let inner: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.display()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }
}

/// Ordered mapping ready to construct or clone a model instance: top-level
/// scalar keys plus, per component, a `{kind}_model` choice and a
/// `{kind}_params` sub-mapping holding only the chosen variant's parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameworkConfig(pub IndexMap<String, ConfigValue>);

impl FrameworkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.0.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn scalar_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ConfigValue::as_f64)
    }

    /// The chosen variant name of one component, `None` when absent or
    /// explicitly null.
    pub fn model_choice(&self, kind: &str) -> Option<&str> {
        self.get(&format!("{kind}_model"))
            .and_then(ConfigValue::as_str)
    }

    /// Insert one parameter into the component's `{kind}_params` sub-mapping,
    /// creating it if needed.
    pub fn set_param(&mut self, kind: &str, name: impl Into<String>, value: ConfigValue) {
        let key = format!("{kind}_params");
        let entry = self
            .0
            .entry(key)
            .or_insert_with(|| ConfigValue::Params(IndexMap::new()));
        if let ConfigValue::Params(map) = entry {
            map.insert(name.into(), value);
        }
    }

    pub fn params(&self, kind: &str) -> Option<&IndexMap<String, ConfigValue>> {
        self.get(&format!("{kind}_params"))
            .and_then(ConfigValue::as_params)
    }

    /// Keys of the form `{kind}_model` together with their chosen variant
    /// (`None` for explicit nulls), in insertion order.
    pub fn model_keys(&self) -> Vec<(String, Option<String>)> {
        self.0
            .iter()
            .filter(|(k, _)| k.ends_with("_model"))
            .map(|(k, v)| {
                (
                    k.trim_end_matches("_model").to_string(),
                    v.as_str().map(str::to_string),
                )
            })
            .collect()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.0.iter()
    }
}
