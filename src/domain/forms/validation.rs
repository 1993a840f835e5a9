//! Form validation: per-field parsing and cross-field checks.

use serde::Serialize;

use super::field::{
    CleanedField, CleanedForm, CleanedValue, FieldDescriptor, FieldKind, RawFields,
};

/// A validation failure tied to one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All validation failures for one submission.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormErrors {
    pub field_errors: Vec<FieldError>,
    pub form_errors: Vec<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.form_errors.is_empty()
    }

    pub fn push_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn push_form(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    /// Record a construction failure raised after validation, surfaced as a
    /// form-level error.
    pub fn from_construction(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push_form(message.into());
        errors
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "on" | "1" => Some(true),
        "" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_range(raw: &str) -> Option<(f64, f64)> {
    let mut parts = raw.trim().split(" - ");
    let lo = parts.next()?.trim().parse::<f64>().ok()?;
    let hi = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lo, hi))
}

fn clean_field(
    descriptor: &FieldDescriptor,
    raw: Option<&str>,
    errors: &mut FormErrors,
) -> Option<CleanedValue> {
    let name = &descriptor.name;

    match &descriptor.kind {
        FieldKind::Bool => {
            // Checkbox semantics: an absent value means unchecked.
            match parse_bool(raw.unwrap_or("")) {
                Some(v) => Some(CleanedValue::Bool(v)),
                None => {
                    errors.push_field(name, format!("'{}' is not a boolean", raw.unwrap_or("")));
                    None
                }
            }
        }
        FieldKind::Float { min, max } => {
            let raw = raw.unwrap_or(&descriptor.initial);
            let value = match raw.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    errors.push_field(name, format!("'{raw}' is not a number"));
                    return None;
                }
            };
            if let Some(min) = min
                && value < *min
            {
                errors.push_field(name, format!("Must be at least {min}"));
                return None;
            }
            if let Some(max) = max
                && value > *max
            {
                errors.push_field(name, format!("Must be at most {max}"));
                return None;
            }
            Some(CleanedValue::Float(value))
        }
        FieldKind::Choice { choices } => {
            let raw = raw.unwrap_or(&descriptor.initial);
            if choices.iter().any(|(v, _)| v == raw) {
                Some(CleanedValue::Str(raw.to_string()))
            } else {
                errors.push_field(name, format!("'{raw}' is not one of the available choices"));
                None
            }
        }
        FieldKind::Range { min, max, .. } => {
            let raw = raw.unwrap_or(&descriptor.initial);
            let Some((lo, hi)) = parse_range(raw) else {
                errors.push_field(name, format!("'{raw}' is not a valid range"));
                return None;
            };
            if lo > hi {
                errors.push_field(name, "Range is inverted");
                return None;
            }
            if lo < *min || hi > *max {
                errors.push_field(name, format!("Range must lie within [{min}, {max}]"));
                return None;
            }
            Some(CleanedValue::Pair(lo, hi))
        }
        FieldKind::Text { max_length } => {
            let raw = raw.unwrap_or(&descriptor.initial).trim();
            if descriptor.required && raw.is_empty() {
                errors.push_field(name, "This field is required");
                return None;
            }
            if let Some(max) = max_length
                && raw.len() > *max
            {
                errors.push_field(name, format!("Must be at most {max} characters"));
                return None;
            }
            Some(CleanedValue::Str(raw.to_string()))
        }
    }
}

/// Validate a submission against the form's descriptors.
///
/// `existing_labels` is the set of labels already stored in the session; the
/// label uniqueness check is skipped when `edit` is set.
pub fn clean(
    descriptors: &[FieldDescriptor],
    submitted: &RawFields,
    existing_labels: &[String],
    edit: bool,
) -> Result<CleanedForm, FormErrors> {
    let mut errors = FormErrors::default();
    let mut form = CleanedForm::default();

    for descriptor in descriptors {
        let raw = submitted.get(&descriptor.name).map(String::as_str);
        let Some(mut value) = clean_field(descriptor, raw, &mut errors) else {
            continue;
        };

        if descriptor.name == "label"
            && let CleanedValue::Str(label) = &mut value
        {
            *label = label.replace('_', "-");
            if !edit && existing_labels.contains(label) {
                errors.push_field("label", "Label must be unique");
                continue;
            }
        }

        form.fields.insert(
            descriptor.name.clone(),
            CleanedField {
                value,
                provenance: descriptor.provenance.clone(),
            },
        );
    }

    // Cross-field checks: a bin step larger than half its range's span leaves
    // too few bins to be meaningful.
    check_step(&form, "lnk_range", "dlnk", "Wavenumber step-size must be less than the k-range.", &mut errors);
    check_step(&form, "logm_range", "dlog10m", "Mass step-size must be less than its range.", &mut errors);

    if errors.is_empty() { Ok(form) } else { Err(errors) }
}

fn check_step(
    form: &CleanedForm,
    range_name: &str,
    step_name: &str,
    message: &str,
    errors: &mut FormErrors,
) {
    let range = form.value(range_name).and_then(CleanedValue::as_pair);
    let step = form.value(step_name).and_then(CleanedValue::as_f64);

    if let (Some((lo, hi)), Some(step)) = (range, step)
        && step > (hi - lo) / 2.0
    {
        errors.push_form(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::assembly::build_form;
    use indexmap::IndexMap;

    fn base_submission() -> RawFields {
        let mut raw = IndexMap::new();
        raw.insert("label".to_string(), "default".to_string());
        raw
    }

    #[test]
    fn test_defaults_validate() {
        let descriptors = build_form(None, None);
        let form = clean(&descriptors, &base_submission(), &[], false).unwrap();
        assert_eq!(form.label(), "default");
        assert!(form.value("bias_model").is_some());
    }

    #[test]
    fn test_step_exceeding_half_range_rejected() {
        let descriptors = build_form(None, None);

        let mut raw = base_submission();
        raw.insert("logm_range".to_string(), "0 - 10".to_string());
        raw.insert("dlog10m".to_string(), "0.9".to_string());
        // 0.9 < 5, fine.
        assert!(clean(&descriptors, &raw, &[], false).is_ok());

        // Use the k-range, whose step field allows larger values relative to
        // a narrow range.
        let mut raw = base_submission();
        raw.insert("lnk_range".to_string(), "0 - 0.5".to_string());
        raw.insert("dlnk".to_string(), "0.4".to_string());
        let errors = clean(&descriptors, &raw, &[], false).unwrap_err();
        assert!(errors
            .form_errors
            .iter()
            .any(|e| e.contains("Wavenumber step-size")));
    }

    #[test]
    fn test_range_step_boundary() {
        // Synthetic descriptor: range [0, 10], step 6 fails, step 4 passes.
        let descriptors = vec![
            FieldDescriptor::new(
                "logm_range",
                "range",
                FieldKind::Range {
                    min: 0.0,
                    max: 20.0,
                    step: 0.1,
                },
            )
            .with_initial("0 - 10"),
            FieldDescriptor::new(
                "dlog10m",
                "step",
                FieldKind::Float {
                    min: None,
                    max: None,
                },
            )
            .with_initial("6"),
        ];

        let raw = IndexMap::new();
        assert!(clean(&descriptors, &raw, &[], false).is_err());

        let mut raw = IndexMap::new();
        raw.insert("dlog10m".to_string(), "4".to_string());
        assert!(clean(&descriptors, &raw, &[], false).is_ok());
    }

    #[test]
    fn test_label_normalization_and_uniqueness() {
        let descriptors = build_form(None, None);

        let mut raw = base_submission();
        raw.insert("label".to_string(), "my_model".to_string());
        let form = clean(&descriptors, &raw, &[], false).unwrap();
        assert_eq!(form.label(), "my-model");

        let existing = vec!["default".to_string()];
        let raw = base_submission();
        let errors = clean(&descriptors, &raw, &existing, false).unwrap_err();
        assert!(errors
            .field_errors
            .iter()
            .any(|e| e.field == "label" && e.message == "Label must be unique"));

        // Editing skips the uniqueness check.
        assert!(clean(&descriptors, &raw, &existing, true).is_ok());
    }

    #[test]
    fn test_malformed_float_rejected() {
        let descriptors = build_form(None, None);
        let mut raw = base_submission();
        raw.insert("sigma_8".to_string(), "not-a-number".to_string());
        let errors = clean(&descriptors, &raw, &[], false).unwrap_err();
        assert!(errors.field_errors.iter().any(|e| e.field == "sigma_8"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let descriptors = build_form(None, None);
        let mut raw = base_submission();
        raw.insert("logm_range".to_string(), "15 - 10".to_string());
        let errors = clean(&descriptors, &raw, &[], false).unwrap_err();
        assert!(errors.field_errors.iter().any(|e| e.field == "logm_range"));
    }

    #[test]
    fn test_unknown_choice_rejected() {
        let descriptors = build_form(None, None);
        let mut raw = base_submission();
        raw.insert("bias_model".to_string(), "NotABias".to_string());
        let errors = clean(&descriptors, &raw, &[], false).unwrap_err();
        assert!(errors.field_errors.iter().any(|e| e.field == "bias_model"));
    }
}
