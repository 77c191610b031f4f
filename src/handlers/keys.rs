//! Key management HTTP handlers.
//!
//! This module implements the key-related API endpoints:
//! - GET /api/v1/keys - List keys, optionally filtered by status
//! - POST /api/v1/keys - Add a key
//! - GET /api/v1/keys/summary - Inventory counts
//! - GET /api/v1/keys/:id - Get one key
//! - DELETE /api/v1/keys/:id - Remove an available key
//! - POST /api/v1/keys/:id/checkout - Check a key out
//! - POST /api/v1/keys/:id/checkin - Check a key in

use crate::{
    error::AppError,
    models::key::{
        CreateKeyRequest, KeyResponse, KeySummary, ListKeysQuery, TransitionRequest,
        TransitionResponse,
    },
    services::coordinator::{LogWrite, Transition},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// List keys.
///
/// # Endpoint
///
/// `GET /api/v1/keys?status=available|checked_out`
///
/// # Response
///
/// - **Success (200 OK)**: Array of keys in stored order (may be empty)
/// - **Error (500)**: Key table unreadable or malformed
///
/// Reads go straight to the key table and are not serialized with writers.
pub async fn list_keys(
    State(state): State<AppState>,
    Query(query): Query<ListKeysQuery>,
) -> Result<Json<Vec<KeyResponse>>, AppError> {
    let keys = state
        .coordinator
        .keys()
        .list_filtered(query.status)
        .await?;

    Ok(Json(keys.into_iter().map(Into::into).collect()))
}

/// Add a new key.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Main Office",
///   "location": "Bldg A"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: The new key, status available
/// - **Error (400)**: Name or location blank
pub async fn create_key(
    State(state): State<AppState>,
    Json(request): Json<CreateKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let key = state
        .coordinator
        .add_key(&request.name, &request.location)
        .await?;

    Ok((StatusCode::CREATED, Json(KeyResponse::from(key))))
}

/// Inventory counts.
///
/// ```json
/// { "total": 12, "checked_out": 3, "available": 9 }
/// ```
pub async fn key_summary(State(state): State<AppState>) -> Result<Json<KeySummary>, AppError> {
    Ok(Json(state.coordinator.keys().summary().await?))
}

/// Get a key by id.
///
/// Returns 404 if the key does not exist.
pub async fn get_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<KeyResponse>, AppError> {
    let key = state
        .coordinator
        .keys()
        .get(&key_id)
        .await?
        .ok_or(AppError::KeyNotFound)?;

    Ok(Json(key.into()))
}

/// Remove a key.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: Key not found
/// - **Error (409)**: Key is checked out
///
/// Log entries for the key are kept.
pub async fn delete_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.coordinator.remove_key(&key_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Check a key out.
///
/// # Request Body
///
/// ```json
/// { "person_name": "Alice" }
/// ```
///
/// # Response (200)
///
/// ```json
/// {
///   "key": { "id": "...", "is_checked_out": true, "checked_out_by": "Alice", ... },
///   "log_entry": { "action": "checkout", "person_name": "Alice", ... },
///   "log_recorded": true
/// }
/// ```
///
/// - **Error (400)**: Person name blank
/// - **Error (404)**: Key not found
/// - **Error (409)**: Key already checked out
pub async fn check_out_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let transition = state
        .coordinator
        .check_out(&key_id, &request.person_name)
        .await?;

    Ok(Json(transition_response(transition)))
}

/// Check a key in.
///
/// Same body and response shape as check-out. The person returning the key
/// does not have to be the one who took it.
///
/// - **Error (409)**: Key is not checked out
pub async fn check_in_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let transition = state
        .coordinator
        .check_in(&key_id, &request.person_name)
        .await?;

    Ok(Json(transition_response(transition)))
}

fn transition_response(transition: Transition) -> TransitionResponse {
    let warning = match &transition.log {
        LogWrite::Recorded(_) => None,
        LogWrite::Missing { reason, .. } => Some(format!(
            "Key updated but log entry was not saved: {}",
            reason
        )),
    };

    TransitionResponse {
        log_entry: transition.log.entry().clone().into(),
        log_recorded: transition.log.is_recorded(),
        key: transition.key.into(),
        warning,
    }
}
