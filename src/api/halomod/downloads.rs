//! Download endpoint handlers

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::SessionId;
use crate::infrastructure::export;

fn zip_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// GET /halomod/download/ascii
pub async fn ascii_data(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, ApiError> {
    debug!(session = %session_id, "exporting ascii data");

    let data = state.session_service.load(&session_id).await?;
    let bytes = export::ascii_data_zip(&data.models)?;
    Ok(zip_attachment("all_data.zip", bytes))
}

/// GET /halomod/download/parameters
pub async fn parameters(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, ApiError> {
    debug!(session = %session_id, "exporting parameters");

    let data = state.session_service.load(&session_id).await?;
    let bytes = export::parameters_zip(&data.models)?;
    Ok(zip_attachment("parameters.zip", bytes))
}

/// GET /halomod/download/halogen
pub async fn halogen(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, ApiError> {
    debug!(session = %session_id, "exporting halogen inputs");

    let data = state.session_service.load(&session_id).await?;
    let bytes = export::halogen_zip(&data.models)?;
    Ok(zip_attachment("halogen.zip", bytes))
}
