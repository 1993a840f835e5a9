//! Calculator API endpoints

pub mod calculator;
pub mod downloads;
pub mod plots;
pub mod report;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create the calculator router
pub fn create_halomod_router() -> Router<AppState> {
    Router::new()
        .route("/", get(calculator::get_session))
        .route(
            "/create",
            get(calculator::create_form).post(calculator::create_model),
        )
        .route(
            "/create/{label}",
            get(calculator::create_form_from).post(calculator::create_model_from),
        )
        .route(
            "/edit/{label}",
            get(calculator::edit_form).post(calculator::edit_model),
        )
        .route("/delete/{label}", post(calculator::delete_model))
        .route("/restart", post(calculator::restart))
        .route("/plots/{format}/{quantity}", get(plots::get_plot))
        .route("/download/ascii", get(downloads::ascii_data))
        .route("/download/parameters", get(downloads::parameters))
        .route("/download/halogen", get(downloads::halogen))
        .route("/report", post(report::submit_report))
}
