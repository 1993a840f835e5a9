//! Derived-quantity export and comparison.

pub mod keymap;
pub mod plot;
pub mod series;

pub use keymap::{resolve, QuantityMeta, ResolvedQuantity, Scale, KEYMAP};
pub use plot::{PlotFormat, PlotRenderer};
pub use series::{collect_series, comparison_compatible, plot_choices, Series};
