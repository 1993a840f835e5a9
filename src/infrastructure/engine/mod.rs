//! Native engine implementation.

mod native;
mod quantities;

pub use native::{NativeEngine, NativeInstance};
