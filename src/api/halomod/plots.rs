//! Plot endpoint handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Extension,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::render::collect_series;
use crate::domain::{PlotFormat, SessionId};

/// GET /halomod/plots/:format/:quantity
///
/// Renders one quantity across every stored model. Individual model failures
/// are recorded on the session's error log and do not fail the request; the
/// request only fails when nothing at all could be plotted.
pub async fn get_plot(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path((format, quantity)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let format: PlotFormat = format.parse().map_err(ApiError::from)?;
    debug!(session = %session_id, quantity = %quantity, ?format, "rendering plot");

    let mut data = state.session_service.load(&session_id).await?;
    let (resolved, series) = collect_series(&data.models, &quantity, &mut data.error_log)?;

    // Persist whatever failures accumulated, even when rendering succeeds.
    state
        .session_service
        .store_error_log(&session_id, data)
        .await?;

    let bytes = state.plot_renderer.render(&resolved, &series, format)?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], bytes))
}
