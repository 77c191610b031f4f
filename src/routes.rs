//! HTTP router.

use crate::{handlers, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public routes; authentication is out of scope for this service
        .route("/health", get(handlers::health::health_check))
        // Key inventory
        .route(
            "/api/v1/keys",
            get(handlers::keys::list_keys).post(handlers::keys::create_key),
        )
        .route("/api/v1/keys/summary", get(handlers::keys::key_summary))
        .route(
            "/api/v1/keys/{id}",
            get(handlers::keys::get_key).delete(handlers::keys::delete_key),
        )
        // Transitions
        .route(
            "/api/v1/keys/{id}/checkout",
            post(handlers::keys::check_out_key),
        )
        .route(
            "/api/v1/keys/{id}/checkin",
            post(handlers::keys::check_in_key),
        )
        // History
        .route("/api/v1/logs", get(handlers::logs::list_logs))
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BlobStore, KEYS_BLOB, MemoryBlobStore};
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Arc<MemoryBlobStore>, Router) {
        let blobs = Arc::new(MemoryBlobStore::new());
        (blobs.clone(), router(AppState::new(blobs)))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_key_lifecycle_over_http() {
        let (_, app) = app();

        let (status, key) = send(
            &app,
            Method::POST,
            "/api/v1/keys",
            Some(json!({"name": "K1", "location": "L1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(key["is_checked_out"], false);
        let id = key["id"].as_str().unwrap().to_string();

        let (status, out) = send(
            &app,
            Method::POST,
            &format!("/api/v1/keys/{}/checkout", id),
            Some(json!({"person_name": "Alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["key"]["checked_out_by"], "Alice");
        assert_eq!(out["log_entry"]["action"], "checkout");
        assert_eq!(out["log_recorded"], true);
        assert!(out.get("warning").is_none());

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/keys/{}/checkout", id),
            Some(json!({"person_name": "Bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "invalid_state");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/keys/{}", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, summary) = send(&app, Method::GET, "/api/v1/keys/summary", None).await;
        assert_eq!(summary, json!({"total": 1, "checked_out": 1, "available": 0}));

        let (status, back) = send(
            &app,
            Method::POST,
            &format!("/api/v1/keys/{}/checkin", id),
            Some(json!({"person_name": "Bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(back["key"]["is_checked_out"], false);
        assert_eq!(back["key"]["checked_out_by"], Value::Null);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/keys/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/keys/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // History outlives the key, newest first
        let (_, logs) = send(&app, Method::GET, "/api/v1/logs?key_name=K1", None).await;
        let logs = logs.as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["action"], "checkin");
        assert_eq!(logs[0]["person_name"], "Bob");
        assert_eq!(logs[1]["action"], "checkout");
        assert_eq!(logs[1]["person_name"], "Alice");
    }

    #[tokio::test]
    async fn test_status_filter() {
        let (_, app) = app();
        for name in ["A", "B"] {
            send(
                &app,
                Method::POST,
                "/api/v1/keys",
                Some(json!({"name": name, "location": "Rack"})),
            )
            .await;
        }
        let (_, all) = send(&app, Method::GET, "/api/v1/keys", None).await;
        let id = all[0]["id"].as_str().unwrap().to_string();
        send(
            &app,
            Method::POST,
            &format!("/api/v1/keys/{}/checkout", id),
            Some(json!({"person_name": "Alice"})),
        )
        .await;

        let (_, out) = send(&app, Method::GET, "/api/v1/keys?status=checked_out", None).await;
        assert_eq!(out.as_array().unwrap().len(), 1);
        assert_eq!(out[0]["id"], id.as_str());

        let (_, available) = send(&app, Method::GET, "/api/v1/keys?status=available", None).await;
        assert_eq!(available.as_array().unwrap().len(), 1);
        assert_eq!(available[0]["name"], "B");
    }

    #[tokio::test]
    async fn test_blank_fields_are_bad_request() {
        let (_, app) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/keys",
            Some(json!({"name": " ", "location": "L1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_malformed_store_is_hidden_internal_error() {
        let (blobs, app) = app();
        blobs.set(KEYS_BLOB, "not json".to_string()).await.unwrap();

        let (status, body) = send(&app, Method::GET, "/api/v1/keys", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
