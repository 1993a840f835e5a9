//! Infrastructure layer - engine binding, persistence, rendering, export and
//! logging.

pub mod engine;
pub mod export;
pub mod logging;
pub mod plotting;
pub mod report;
pub mod session;
