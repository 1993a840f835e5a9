//! Zip archive exporters for the stored model collection.

use std::io::{Cursor, Write};

use chrono::Utc;
use indexmap::IndexMap;
use tracing::warn;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::domain::engine::AxisKind;
use crate::domain::render::KEYMAP;
use crate::domain::session::StoredModel;
use crate::domain::DomainError;

fn zip_error(e: zip::result::ZipError) -> DomainError {
    DomainError::internal(format!("zip archive: {e}"))
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::internal(format!("zip archive: {e}"))
}

/// Every derived quantity of every model, one text file per (label, axis)
/// pair. Each file is the axis grid plus one column per quantity that was
/// computable for that model, with a commented header naming the columns.
pub fn ascii_data_zip(
    models: &IndexMap<String, StoredModel>,
) -> Result<Vec<u8>, DomainError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (label, stored) in models {
        for axis in AxisKind::ALL {
            let x = stored.instance.grid(axis)?;

            let mut columns: Vec<(&str, &'static str, Vec<f64>)> = Vec::new();
            for (&name, meta) in KEYMAP.iter() {
                if meta.axis != axis {
                    continue;
                }
                match stored.instance.quantity(name) {
                    Ok(Some(y)) => columns.push((name, meta.ylabel, y)),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(label = %label, quantity = %name, error = %err, "skipped in export");
                    }
                }
            }
            if columns.is_empty() {
                continue;
            }

            let mut body = String::new();
            body.push_str(&format!("# [0] {}\n", axis.xlabel()));
            for (index, (name, ylabel, _)) in columns.iter().enumerate() {
                body.push_str(&format!("# [{}] {name}: {ylabel}\n", index + 1));
            }
            for (row, x_value) in x.iter().enumerate() {
                body.push_str(&format!("{x_value:.6e}"));
                for (_, _, y) in &columns {
                    body.push_str(&format!(" {:.6e}", y[row]));
                }
                body.push('\n');
            }

            zip.start_file(format!("{label}_{}.txt", axis.as_str()), FileOptions::default())
                .map_err(zip_error)?;
            zip.write_all(body.as_bytes()).map_err(io_error)?;
        }
    }

    let cursor = zip.finish().map_err(zip_error)?;
    Ok(cursor.into_inner())
}

/// The effective parameters of every model, one text file per label.
pub fn parameters_zip(
    models: &IndexMap<String, StoredModel>,
) -> Result<Vec<u8>, DomainError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let generated = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    for (label, stored) in models {
        let mut body = String::new();
        body.push_str(&format!(
            "# Halo-model parameters for '{label}'\n# Generated {generated} by TheHaloMod v{}\n\n",
            env!("CARGO_PKG_VERSION"),
        ));
        for (key, value) in stored.instance.parameter_values() {
            body.push_str(&format!("{key}: {value}\n"));
        }

        zip.start_file(format!("{label}.txt"), FileOptions::default())
            .map_err(zip_error)?;
        zip.write_all(body.as_bytes()).map_err(io_error)?;
    }

    let cursor = zip.finish().map_err(zip_error)?;
    Ok(cursor.into_inner())
}

/// Input files for the HALOgen mock-catalogue generator: the cumulative mass
/// function and the linear matter power spectrum, per model.
pub fn halogen_zip(models: &IndexMap<String, StoredModel>) -> Result<Vec<u8>, DomainError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (label, stored) in models {
        let m = stored.instance.grid(AxisKind::M)?;
        let ngtm = stored
            .instance
            .quantity("ngtm")?
            .ok_or_else(|| DomainError::render("n(>m) is not computable for this model"))?;
        let k = stored.instance.grid(AxisKind::K)?;
        let power = stored
            .instance
            .quantity("power")?
            .ok_or_else(|| DomainError::render("power is not computable for this model"))?;

        let mut body = String::new();
        for (m, n) in m.iter().zip(&ngtm) {
            body.push_str(&format!("{m:.6e} {n:.6e}\n"));
        }
        zip.start_file(format!("ngtm_{label}.txt"), FileOptions::default())
            .map_err(zip_error)?;
        zip.write_all(body.as_bytes()).map_err(io_error)?;

        let mut body = String::new();
        for (k, p) in k.iter().zip(&power) {
            body.push_str(&format!("{k:.6e} {p:.6e}\n"));
        }
        zip.start_file(format!("matterpower_{label}.txt"), FileOptions::default())
            .map_err(zip_error)?;
        zip.write_all(body.as_bytes()).map_err(io_error)?;
    }

    let cursor = zip.finish().map_err(zip_error)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine::{HaloEngine, ModelClass};
    use crate::domain::framework::FrameworkConfig;
    use crate::infrastructure::engine::NativeEngine;
    use zip::ZipArchive;

    fn models(labels: &[&str]) -> IndexMap<String, StoredModel> {
        let engine = NativeEngine::new();
        labels
            .iter()
            .map(|label| {
                (
                    label.to_string(),
                    StoredModel {
                        instance: engine
                            .construct(ModelClass::Tracer, &FrameworkConfig::new())
                            .unwrap(),
                        raw_fields: None,
                    },
                )
            })
            .collect()
    }

    fn names(bytes: Vec<u8>) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_ascii_zip_has_file_per_label_and_axis() {
        let bytes = ascii_data_zip(&models(&["a", "b"])).unwrap();
        let names = names(bytes);
        for expected in ["a_m.txt", "a_k.txt", "a_r.txt", "a_k_hm.txt", "b_m.txt"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_ascii_columns_match_header() {
        let bytes = ascii_data_zip(&models(&["a"])).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("a_m.txt").unwrap(), &mut content)
            .unwrap();

        let header_columns = content.lines().take_while(|l| l.starts_with('#')).count();
        let first_row = content
            .lines()
            .find(|l| !l.starts_with('#'))
            .unwrap()
            .split_whitespace()
            .count();
        assert_eq!(header_columns, first_row);
    }

    #[test]
    fn test_parameters_zip_covers_every_label() {
        let bytes = parameters_zip(&models(&["a", "b", "c"])).unwrap();
        let names = names(bytes);
        assert_eq!(names.len(), 3);
        for expected in ["a.txt", "b.txt", "c.txt"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_halogen_zip_layout() {
        let bytes = halogen_zip(&models(&["a"])).unwrap();
        let names = names(bytes);
        assert!(names.iter().any(|n| n == "ngtm_a.txt"));
        assert!(names.iter().any(|n| n == "matterpower_a.txt"));
    }
}
