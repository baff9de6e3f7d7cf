use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use dealsync_core::event::DealEvent;

/// POST /test/trigger — synthesize one canonical closed-won event and push
/// it through the same internal path as a real webhook. Manual-testing aid.
pub async fn trigger(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let event = DealEvent::closed_won("12345");
    tracing::info!("test trigger fired");

    if app.job_tx.send(vec![event.clone()]).await.is_err() {
        tracing::warn!("reconcile worker unavailable, dropping test event");
    }

    Ok(Json(serde_json::json!({
        "message": "Test webhook triggered",
        "data": event,
    })))
}
