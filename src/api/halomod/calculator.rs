//! Model-collection endpoint handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, FormResponse, SessionResponse};
use crate::domain::{build_form, RawFields, SessionId};

/// GET /halomod
pub async fn get_session(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SessionResponse>, ApiError> {
    debug!(session = %session_id, "loading session overview");

    let data = state.session_service.load(&session_id).await?;
    Ok(Json(SessionResponse::from_session(&data)))
}

/// GET /halomod/create
pub async fn create_form() -> Json<FormResponse> {
    Json(FormResponse {
        fields: build_form(None, None),
    })
}

/// POST /halomod/create
pub async fn create_model(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(raw): Json<RawFields>,
) -> Result<Json<SessionResponse>, ApiError> {
    debug!(session = %session_id, "creating model");

    let data = state.session_service.submit(&session_id, raw, None).await?;
    Ok(Json(SessionResponse::from_session(&data)))
}

/// GET /halomod/create/:label
pub async fn create_form_from(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path(label): Path<String>,
) -> Result<Json<FormResponse>, ApiError> {
    debug!(session = %session_id, source = %label, "building clone form");

    let fields = state.session_service.clone_form(&session_id, &label).await?;
    Ok(Json(FormResponse { fields }))
}

/// POST /halomod/create/:label
pub async fn create_model_from(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path(label): Path<String>,
    Json(raw): Json<RawFields>,
) -> Result<Json<SessionResponse>, ApiError> {
    debug!(session = %session_id, source = %label, "creating model from clone");

    let data = state
        .session_service
        .submit_from(&session_id, raw, &label)
        .await?;
    Ok(Json(SessionResponse::from_session(&data)))
}

/// GET /halomod/edit/:label
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path(label): Path<String>,
) -> Result<Json<FormResponse>, ApiError> {
    debug!(session = %session_id, label = %label, "building edit form");

    let fields = state.session_service.edit_form(&session_id, &label).await?;
    Ok(Json(FormResponse { fields }))
}

/// POST /halomod/edit/:label
pub async fn edit_model(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path(label): Path<String>,
    Json(raw): Json<RawFields>,
) -> Result<Json<SessionResponse>, ApiError> {
    debug!(session = %session_id, label = %label, "editing model");

    let data = state
        .session_service
        .submit(&session_id, raw, Some(&label))
        .await?;
    Ok(Json(SessionResponse::from_session(&data)))
}

/// POST /halomod/delete/:label
pub async fn delete_model(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path(label): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    debug!(session = %session_id, label = %label, "deleting model");

    let data = state.session_service.delete(&session_id, &label).await?;
    Ok(Json(SessionResponse::from_session(&data)))
}

/// POST /halomod/restart
pub async fn restart(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SessionResponse>, ApiError> {
    debug!(session = %session_id, "restarting session");

    let data = state.session_service.restart(&session_id).await?;
    Ok(Json(SessionResponse::from_session(&data)))
}
