//! Field descriptors and cleaned values for the composite configuration form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw submitted field values, keyed by wire field name.
pub type RawFields = IndexMap<String, String>;

/// Widget kind of one form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Float {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Bool,
    Choice {
        choices: Vec<(String, String)>,
    },
    /// Compound slider; wire encoding is `"{low} - {high}"`, cleaned value an
    /// ordered pair of floats.
    Range {
        min: f64,
        max: f64,
        step: f64,
    },
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
}

/// Links a field back to its owning component, variant and parameter name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProvenance {
    pub component: String,
    /// `None` for extra fields that apply regardless of the chosen variant.
    pub model: Option<String>,
    pub paramname: String,
}

/// One field of the composite form, as handed to the client for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Wire-encoded initial value.
    pub initial: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<FieldProvenance>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            initial: String::new(),
            required: false,
            provenance: None,
        }
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = initial.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_provenance(
        mut self,
        component: impl Into<String>,
        model: Option<String>,
        paramname: impl Into<String>,
    ) -> Self {
        self.provenance = Some(FieldProvenance {
            component: component.into(),
            model,
            paramname: paramname.into(),
        });
        self
    }
}

/// Parsed value of one submitted field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanedValue {
    Float(f64),
    Bool(bool),
    Str(String),
    /// Cleaned form of a range field.
    Pair(f64, f64),
}

impl CleanedValue {
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

    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            Self::Pair(a, b) => Some((*a, *b)),
            _ => None,
        }
    }
}

/// One cleaned field together with its provenance tag.
#[derive(Debug, Clone)]
pub struct CleanedField {
    pub value: CleanedValue,
    pub provenance: Option<FieldProvenance>,
}

/// The fully validated form, in field order.
#[derive(Debug, Clone, Default)]
pub struct CleanedForm {
    pub fields: IndexMap<String, CleanedField>,
}

impl CleanedForm {
    /// The (normalized) model label. Validation guarantees its presence.
    pub fn label(&self) -> &str {
        self.fields
            .get("label")
            .and_then(|f| f.value.as_str())
            .unwrap_or_default()
    }

    pub fn value(&self, name: &str) -> Option<&CleanedValue> {
        self.fields.get(name).map(|f| &f.value)
    }
}
