//! TheHaloMod API
//!
//! A web front-end for halo-model calculations:
//! - session-scoped collections of labelled model configurations
//! - a composite configuration form generated from the component schema
//! - derived-quantity plotting, comparison and archive export

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::engine::NativeEngine;
use infrastructure::plotting::PlottersRenderer;
use infrastructure::report::LogReportSink;
use infrastructure::session::{InMemorySessionRepository, SessionService};

/// Wire up the default in-process service stack.
pub fn create_app_state() -> AppState {
    let engine = Arc::new(NativeEngine::new());
    let repository = Arc::new(InMemorySessionRepository::new());

    AppState {
        session_service: Arc::new(SessionService::new(engine, repository)),
        plot_renderer: Arc::new(PlottersRenderer::new()),
        report_sink: Arc::new(LogReportSink::new()),
    }
}
