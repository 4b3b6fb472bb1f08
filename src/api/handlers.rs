//! HTTP request handlers

use super::types::WebhookEnvelope;
use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Webhook receiver registered in the LINE developers console;
        // GET is the console's endpoint verification probe
        .route("/api/webhook", get(verify_webhook).post(receive_webhook))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Webhook
// ============================================================

/// Receive one webhook delivery from the LINE platform.
///
/// Every consumable event in the batch is processed; the delivery is
/// always answered. A 500 is reported only when an infrastructure
/// failure occurred, since user-recoverable conditions were already
/// answered with corrective replies.
async fn receive_webhook(
    State(state): State<AppState>,
    Json(envelope): Json<WebhookEnvelope>,
) -> (StatusCode, &'static str) {
    let received = envelope.events.len();
    let events: Vec<_> = envelope
        .events
        .into_iter()
        .filter_map(|event| {
            let inbound = event.into_inbound();
            if inbound.is_none() {
                tracing::debug!("Skipping webhook event the bot does not consume");
            }
            inbound
        })
        .collect();

    tracing::info!(received, consumed = events.len(), "Webhook delivery");

    let errors = state.processor.process_batch(events).await;
    if errors.is_empty() {
        (StatusCode::OK, "OK")
    } else {
        tracing::error!(failed = errors.len(), "Webhook delivery had failing events");
        (StatusCode::INTERNAL_SERVER_ERROR, "ERROR")
    }
}

/// Endpoint verification probe
async fn verify_webhook() -> &'static str {
    "OK"
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("jisseki-bot ", env!("CARGO_PKG_VERSION"))
}
