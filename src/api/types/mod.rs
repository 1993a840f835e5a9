//! Wire types of the JSON API

pub mod error;
pub mod models;

pub use error::{ApiError, ApiErrorResponse};
pub use models::{FormResponse, PlotChoice, ReportRequest, SessionResponse};
