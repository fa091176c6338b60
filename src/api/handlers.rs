//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    state::{AppState, ViewerError},
    store::{ChangeEvent, StoreError},
};
use super::responses::{
    ChangeAcceptedResponse, ErrorResponse, HealthResponse, StatusResponse, ViewerResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn viewer_error(e: ViewerError) -> ApiError {
    let status = match &e {
        ViewerError::NotMounted(_) => StatusCode::NOT_FOUND,
        ViewerError::Subscribe(_) => StatusCode::SERVICE_UNAVAILABLE,
        ViewerError::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(e.to_string())))
}

fn store_error(e: StoreError) -> ApiError {
    let status = match &e {
        StoreError::InvalidRecord(_) | StoreError::UnknownTable(_) => StatusCode::BAD_REQUEST,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(e.to_string())))
}

/// Handle POST /matches/:match_id/viewer - Mount a viewer
pub async fn mount_viewer_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> Result<Json<ViewerResponse>, ApiError> {
    match state.mount_viewer(&match_id) {
        Ok(rendered) => {
            info!("Viewer mounted for match {} ({} {})", match_id, rendered.label, rendered.formatted);
            Ok(Json(ViewerResponse::new(match_id, rendered)))
        }
        Err(e) => {
            error!("Failed to mount viewer for match {}: {}", match_id, e);
            Err(viewer_error(e))
        }
    }
}

/// Handle DELETE /matches/:match_id/viewer - Tear down a viewer
pub async fn unmount_viewer_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .unmount_viewer(&match_id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| {
            warn!("Failed to unmount viewer for match {}: {}", match_id, e);
            viewer_error(e)
        })
}

/// Handle GET /matches/:match_id/timer - Current display of a mounted match
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> Result<Json<ViewerResponse>, ApiError> {
    state
        .get_display(&match_id)
        .map(|display| Json(ViewerResponse::new(match_id, display)))
        .map_err(viewer_error)
}

/// Handle POST /changes - Realtime change notification from the backend
pub async fn change_handler(
    State(state): State<Arc<AppState>>,
    Json(event): Json<ChangeEvent>,
) -> Result<(StatusCode, Json<ChangeAcceptedResponse>), ApiError> {
    let event_type = event.event_type;
    match state.ingest_change(event) {
        Ok(push) => Ok((
            StatusCode::ACCEPTED,
            Json(ChangeAcceptedResponse::accepted(event_type, push.match_id)),
        )),
        Err(e) => {
            warn!("Rejected {:?} change: {}", event_type, e);
            Err(store_error(e))
        }
    }
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        mounted_viewers: state.mounted_matches(),
        feed_subscribers: state.store.subscriber_count(),
        tick_interval_ms: state.tick_interval.as_millis() as u64,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
