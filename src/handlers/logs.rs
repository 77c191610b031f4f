//! Checkout log HTTP handlers.

use crate::{
    error::AppError,
    models::log_entry::{ListLogsQuery, LogEntryResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};

/// List log entries, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/logs?key_name=Main%20Office&limit=50`
///
/// # Response (200 OK)
///
/// ```json
/// [
///   {
///     "id": "0190f5c2-...",
///     "key_name": "Main Office",
///     "action": "checkin",
///     "person_name": "Bob",
///     "timestamp": "2025-12-21T16:00:00Z"
///   }
/// ]
/// ```
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> Result<Json<Vec<LogEntryResponse>>, AppError> {
    let entries = state
        .coordinator
        .logs()
        .list_recent(query.key_name.as_deref(), query.limit)
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
