//! Problem-report endpoint handler

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ReportRequest};
use crate::domain::{ProblemReport, SessionId};

/// POST /halomod/report
pub async fn submit_report(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<ReportRequest>,
) -> Result<StatusCode, ApiError> {
    debug!(session = %session_id, "submitting problem report");

    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("A report needs a message").with_param("message"));
    }

    // Snapshot every stored model's effective parameters so the report can be
    // reproduced without the session.
    let data = state.session_service.load(&session_id).await?;
    let model_parameters = data
        .models
        .iter()
        .map(|(label, stored)| (label.clone(), stored.instance.parameter_values()))
        .collect();

    let report = ProblemReport {
        name: request.name,
        email: request.email,
        message: request.message,
        bad_labels: request.bad_labels,
        bad_quantities: request.bad_quantities,
        model_parameters,
        submitted_at: Utc::now(),
    };
    state.report_sink.submit(report).await?;

    Ok(StatusCode::ACCEPTED)
}
