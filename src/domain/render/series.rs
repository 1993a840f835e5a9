//! Series extraction for plotting, export and pairwise comparison.
//!
//! One broken model/quantity combination never prevents rendering the others:
//! failures are recorded in the session's error log per (label, quantity) and
//! the batch continues.

use indexmap::IndexMap;
use tracing::warn;

use super::keymap::{resolve, ResolvedQuantity, KEYMAP};
use crate::domain::engine::AxisKind;
use crate::domain::session::{log_render_error, ErrorLog, StoredModel};
use crate::domain::DomainError;

/// One plottable/exportable series.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Collect one series per stored model for `quantity`.
///
/// For `comparison_*` quantities, the first stored model is the reference and
/// every other model's series is the elementwise ratio against it; the
/// reference itself emits no series.
pub fn collect_series(
    models: &IndexMap<String, StoredModel>,
    quantity: &str,
    error_log: &mut ErrorLog,
) -> Result<(ResolvedQuantity, Vec<Series>), DomainError> {
    let resolved = resolve(quantity)?;
    let mut series = Vec::new();

    let mut reference: Option<(String, Vec<f64>)> = None;

    for (index, (label, stored)) in models.iter().enumerate() {
        let y = match stored.instance.quantity(&resolved.base) {
            Ok(Some(y)) => y,
            Ok(None) => {
                warn!(label = %label, quantity = %quantity, "quantity not computable");
                log_render_error(
                    error_log,
                    label,
                    quantity,
                    "quantity is not computable under this configuration",
                );
                continue;
            }
            Err(err) => {
                warn!(label = %label, quantity = %quantity, error = %err, "render failed");
                log_render_error(error_log, label, quantity, &err.to_string());
                continue;
            }
        };

        if !resolved.comparison {
            let x = stored.instance.grid(resolved.meta.axis)?;
            series.push(Series {
                label: label.clone(),
                x,
                y,
            });
            continue;
        }

        // Comparison mode: the first model that yields a value is the
        // denominator for everything after it.
        if index == 0 {
            reference = Some((label.clone(), y));
            continue;
        }

        let Some((_, reference_y)) = &reference else {
            log_render_error(
                error_log,
                label,
                quantity,
                "comparison reference model has no value for this quantity",
            );
            continue;
        };

        if reference_y.len() != y.len() {
            log_render_error(
                error_log,
                label,
                quantity,
                "series length differs from the comparison reference",
            );
            continue;
        }

        let x = stored.instance.grid(resolved.meta.axis)?;
        let ratio: Vec<f64> = y.iter().zip(reference_y).map(|(a, b)| a / b).collect();
        series.push(Series {
            label: label.clone(),
            x,
            y: ratio,
        });
    }

    Ok((resolved, series))
}

/// Whether the stored models' mass grids agree closely enough for pairwise
/// comparison quantities to be meaningful.
pub fn comparison_compatible(models: &IndexMap<String, StoredModel>) -> bool {
    if models.len() < 2 {
        return false;
    }

    let mut grids = models.values().map(|stored| stored.instance.grid(AxisKind::M));

    let Some(Ok(first)) = grids.next() else {
        return false;
    };

    grids.all(|grid| match grid {
        Ok(grid) => {
            grid.len() == first.len()
                && grid.first() == first.first()
                && grid.last() == first.last()
        }
        Err(_) => false,
    })
}

/// The plot-choice list offered for the current session: every plain quantity
/// plus, when the stored models' mass grids match, the comparison entries.
pub fn plot_choices(models: &IndexMap<String, StoredModel>) -> Vec<(String, String)> {
    let mut choices: Vec<(String, String)> = KEYMAP
        .iter()
        .map(|(key, meta)| (key.to_string(), meta.choice_label.to_string()))
        .collect();

    if comparison_compatible(models) {
        choices.push((
            "comparison_dndm".to_string(),
            "Comparison of Mass Functions".to_string(),
        ));
        choices.push((
            "comparison_fsigma".to_string(),
            "Comparison of Fitting Functions".to_string(),
        ));
    }

    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine::{HaloEngine, ModelClass};
    use crate::domain::framework::{ConfigValue, FrameworkConfig};
    use crate::infrastructure::engine::NativeEngine;

    fn stored(config: &[(&str, ConfigValue)]) -> StoredModel {
        let engine = NativeEngine::new();
        let mut cfg = FrameworkConfig::new();
        for (key, value) in config {
            cfg.set(key.to_string(), value.clone());
        }
        StoredModel {
            instance: engine.construct(ModelClass::Tracer, &cfg).unwrap(),
            raw_fields: None,
        }
    }

    fn models(entries: Vec<(&str, StoredModel)>) -> IndexMap<String, StoredModel> {
        entries
            .into_iter()
            .map(|(label, stored)| (label.to_string(), stored))
            .collect()
    }

    #[test]
    fn test_plain_series_per_label() {
        let models = models(vec![("a", stored(&[])), ("b", stored(&[]))]);
        let mut log = ErrorLog::default();

        let (_, series) = collect_series(&models, "dndm", &mut log).unwrap();
        assert_eq!(series.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_none_quantity_logged_not_fatal() {
        // UnityBias makes sd_bias_correction non-computable.
        let broken = stored(&[("bias_model", ConfigValue::Str("UnityBias".to_string()))]);
        let models = models(vec![("a", stored(&[])), ("broken", broken), ("c", stored(&[]))]);
        let mut log = ErrorLog::default();

        let (_, series) = collect_series(&models, "sd_bias_correction", &mut log).unwrap();
        assert_eq!(series.len(), 2);

        let by_message = log.get("broken").unwrap();
        let quantities: Vec<_> = by_message.values().flatten().collect();
        assert_eq!(quantities, vec!["sd_bias_correction"]);
    }

    #[test]
    fn test_comparison_ratio_against_first() {
        let models = models(vec![("ref", stored(&[])), ("other", stored(&[]))]);
        let mut log = ErrorLog::default();

        let (resolved, series) = collect_series(&models, "comparison_dndm", &mut log).unwrap();
        assert!(resolved.comparison);
        // The reference emits no series of its own.
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "other");
        // Identical configurations: the ratio is unity everywhere.
        assert!(series[0].y.iter().all(|v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_comparison_suppressed_for_mismatched_grids() {
        let narrow = stored(&[
            ("Mmin", ConfigValue::Float(11.0)),
            ("Mmax", ConfigValue::Float(14.0)),
        ]);
        let models = models(vec![("a", stored(&[])), ("b", narrow)]);

        assert!(!comparison_compatible(&models));
        let choices = plot_choices(&models);
        assert!(choices.iter().all(|(key, _)| !key.starts_with("comparison_")));
    }

    #[test]
    fn test_comparison_offered_for_matching_grids() {
        let models = models(vec![("a", stored(&[])), ("b", stored(&[]))]);
        let choices = plot_choices(&models);
        assert!(choices.iter().any(|(key, _)| key == "comparison_dndm"));
        assert!(choices.iter().any(|(key, _)| key == "comparison_fsigma"));
    }

    #[test]
    fn test_single_model_never_offers_comparisons() {
        let models = models(vec![("a", stored(&[]))]);
        assert!(!comparison_compatible(&models));
    }
}
