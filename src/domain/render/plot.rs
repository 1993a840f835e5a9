//! Plot-rendering boundary.

use std::str::FromStr;

use super::keymap::ResolvedQuantity;
use super::series::Series;
use crate::domain::DomainError;

/// Requested output format of a rendered plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotFormat {
    Png,
    Svg,
    Pdf,
}

impl PlotFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for PlotFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            other => Err(DomainError::validation(format!(
                "'{other}' is not a valid plot format (png, svg or pdf)"
            ))),
        }
    }
}

/// Renders series into an image. The concrete backend lives in the
/// infrastructure layer.
pub trait PlotRenderer: Send + Sync {
    fn render(
        &self,
        quantity: &ResolvedQuantity,
        series: &[Series],
        format: PlotFormat,
    ) -> Result<Vec<u8>, DomainError>;
}
