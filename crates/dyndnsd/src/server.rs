//! HTTP front end for the request handler
//!
//! | Method | Path      | Body                      |
//! |--------|-----------|---------------------------|
//! | POST   | `/`       | inbound event JSON        |
//! | POST   | `/update` | inbound event JSON        |
//! | GET    | `/health` | none                      |
//!
//! Event endpoints always answer 200 with a `ReconciliationResult`; the
//! outcome is in `return_status`, never in the HTTP status.
//!
//! An event without `source_ip` is filled in from the first
//! `X-Forwarded-For` entry, or else from the peer address of the connection.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{get, post},
};
use dyndns_core::{Error, ReconciliationResult, RequestHandler};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    handler: Arc<RequestHandler>,
}

impl AppState {
    pub fn new(handler: RequestHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_event))
        .route("/update", post(handle_event))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Handle one inbound event
async fn handle_event(
    State(state): State<AppState>,
    parts: Parts,
    body: Bytes,
) -> Json<ReconciliationResult> {
    let result = match serde_json::from_slice::<Value>(&body) {
        Ok(mut value) => {
            fill_source_ip(&mut value, &parts);
            state.handler.handle_value(value).await
        }
        Err(e) => {
            debug!("Rejected request body that is not JSON: {}", e);
            Error::invalid_input(format!("Malformed event: {}", e)).into()
        }
    };
    Json(result)
}

/// Default a missing `source_ip` to the caller's address
fn fill_source_ip(event: &mut Value, parts: &Parts) {
    let Some(fields) = event.as_object_mut() else {
        return;
    };
    if fields.get("source_ip").is_some_and(|ip| !ip.is_null()) {
        return;
    }
    if let Some(ip) = caller_ip(parts) {
        debug!("Using caller address {} as source_ip", ip);
        fields.insert("source_ip".to_string(), Value::String(ip));
    }
}

/// First `X-Forwarded-For` entry, else the connection's peer address
fn caller_ip(parts: &Parts) -> Option<String> {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match forwarded {
        Some(ip) => Some(ip.to_string()),
        None => parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string()),
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "healthy"})))
}
