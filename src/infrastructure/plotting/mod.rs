//! Plot rendering via plotters.
//!
//! SVG renders straight into an in-memory string; PNG goes through the bitmap
//! backend, which only encodes to a file path, so it takes a detour through a
//! temporary file. PDF is not supported by this renderer binding.

use std::io::Read;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::domain::render::keymap::Scale;
use crate::domain::render::{PlotFormat, PlotRenderer, ResolvedQuantity, Series};
use crate::domain::DomainError;

const PLOT_SIZE: (u32, u32) = (900, 600);

pub struct PlottersRenderer;

impl PlottersRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotRenderer for PlottersRenderer {
    fn render(
        &self,
        resolved: &ResolvedQuantity,
        series: &[Series],
        format: PlotFormat,
    ) -> Result<Vec<u8>, DomainError> {
        let points = transform(resolved, series)?;
        debug!(quantity = %resolved.base, series = series.len(), ?format, "rendering plot");

        match format {
            PlotFormat::Svg => {
                let mut svg = String::new();
                {
                    let root = SVGBackend::with_string(&mut svg, PLOT_SIZE).into_drawing_area();
                    draw_chart(&root, &points)?;
                }
                Ok(svg.into_bytes())
            }
            PlotFormat::Png => {
                let file = tempfile::Builder::new()
                    .suffix(".png")
                    .tempfile()
                    .map_err(|e| DomainError::render(format!("temporary file: {e}")))?;
                {
                    let root =
                        BitMapBackend::new(file.path(), PLOT_SIZE).into_drawing_area();
                    draw_chart(&root, &points)?;
                }
                let mut bytes = Vec::new();
                file.reopen()
                    .and_then(|mut f| f.read_to_end(&mut bytes))
                    .map_err(|e| DomainError::render(format!("temporary file: {e}")))?;
                Ok(bytes)
            }
            PlotFormat::Pdf => Err(DomainError::render(
                "PDF output is not supported; request svg or png",
            )),
        }
    }
}

/// One series with axis scaling already applied.
struct TransformedSeries {
    points: Vec<(f64, f64)>,
}

struct TransformedPlot {
    series: Vec<TransformedSeries>,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

/// Apply the quantity's axis scaling: the x axis is always logarithmic, the y
/// axis follows the quantity's metadata. Points that cannot be placed on a
/// log axis are dropped rather than failing the plot.
fn transform(
    resolved: &ResolvedQuantity,
    series: &[Series],
) -> Result<TransformedPlot, DomainError> {
    let log_y = resolved.meta.yscale == Scale::Log;

    let mut out = Vec::with_capacity(series.len());
    let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);

    for one in series {
        let points: Vec<(f64, f64)> = one
            .x
            .iter()
            .zip(&one.y)
            .filter(|(x, y)| **x > 0.0 && x.is_finite() && y.is_finite() && (!log_y || **y > 0.0))
            .map(|(x, y)| (x.log10(), if log_y { y.log10() } else { *y }))
            .collect();

        for (x, y) in &points {
            x_range = (x_range.0.min(*x), x_range.1.max(*x));
            y_range = (y_range.0.min(*y), y_range.1.max(*y));
        }
        if !points.is_empty() {
            out.push(TransformedSeries { points });
        }
    }

    if out.is_empty() {
        return Err(DomainError::render("no plottable series"));
    }

    // A flat series still needs a non-degenerate viewport.
    if y_range.0 == y_range.1 {
        y_range = (y_range.0 - 1.0, y_range.1 + 1.0);
    }

    Ok(TransformedPlot {
        series: out,
        x_range,
        y_range,
    })
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, plot: &TransformedPlot) -> Result<(), DomainError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| DomainError::render(e.to_string()))?;

    let margin = |range: (f64, f64)| {
        let pad = (range.1 - range.0) * 0.05;
        (range.0 - pad)..(range.1 + pad)
    };

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(margin(plot.x_range), margin(plot.y_range))
        .map_err(|e| DomainError::render(e.to_string()))?;

    // The font stack is not linked in, so the mesh draws grid lines only.
    chart
        .configure_mesh()
        .disable_x_axis()
        .disable_y_axis()
        .draw()
        .map_err(|e| DomainError::render(e.to_string()))?;

    for (index, series) in plot.series.iter().enumerate() {
        let color = Palette99::pick(index).mix(0.9);
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), &color))
            .map_err(|e| DomainError::render(e.to_string()))?;
    }

    root.present()
        .map_err(|e| DomainError::render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::render::resolve;

    fn series() -> Vec<Series> {
        vec![Series {
            label: "default".to_string(),
            x: (1..100).map(|i| i as f64).collect(),
            y: (1..100).map(|i| 1.0 / i as f64).collect(),
        }]
    }

    #[test]
    fn test_svg_renders_in_memory() {
        let renderer = PlottersRenderer::new();
        let resolved = resolve("dndm").unwrap();

        let bytes = renderer.render(&resolved, &series(), PlotFormat::Svg).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("<svg"));
    }

    #[test]
    fn test_png_has_magic_bytes() {
        let renderer = PlottersRenderer::new();
        let resolved = resolve("dndm").unwrap();

        let bytes = renderer.render(&resolved, &series(), PlotFormat::Png).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_pdf_rejected() {
        let renderer = PlottersRenderer::new();
        let resolved = resolve("dndm").unwrap();
        assert!(renderer.render(&resolved, &series(), PlotFormat::Pdf).is_err());
    }

    #[test]
    fn test_empty_series_rejected() {
        let renderer = PlottersRenderer::new();
        let resolved = resolve("dndm").unwrap();
        assert!(renderer.render(&resolved, &[], PlotFormat::Svg).is_err());
    }

    #[test]
    fn test_nonpositive_values_dropped_on_log_axis() {
        let renderer = PlottersRenderer::new();
        let resolved = resolve("dndm").unwrap();

        let mut one = series();
        one[0].y[0] = 0.0;
        one[0].y[1] = f64::NAN;
        assert!(renderer.render(&resolved, &one, PlotFormat::Svg).is_ok());
    }
}
