//! Application state for shared services

use std::sync::Arc;

use crate::domain::{PlotRenderer, ReportSink};
use crate::infrastructure::session::SessionService;

/// Shared services handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub plot_renderer: Arc<dyn PlotRenderer>,
    pub report_sink: Arc<dyn ReportSink>,
}
