use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use dealsync_core::event::WebhookPayload;

/// POST /webhook/hubspot/deal-won — accept a CRM event (or batch of events)
/// and acknowledge immediately. HubSpot enforces a response-time limit on
/// webhook subscribers, so the 200 goes out as soon as the body parses;
/// reconciliation happens on the worker after this handler returns.
pub async fn deal_won(
    State(app): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    let events = payload.into_events();
    tracing::info!(events = events.len(), "received hubspot webhook");

    if app.job_tx.send(events).await.is_err() {
        // Worker gone; the ack contract still holds.
        tracing::warn!("reconcile worker unavailable, dropping batch");
    }

    Ok(Json(serde_json::json!({ "received": true })))
}
