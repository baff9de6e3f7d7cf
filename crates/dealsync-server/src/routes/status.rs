use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET / and GET /api/status — health document.
pub async fn status(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let total = tokio::task::spawn_blocking(move || store.load().len())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(serde_json::json!({
        "status": "running",
        "message": "HubSpot-Basecamp integration relay",
        "totalProjects": total,
        "hubspotConnected": app.hubspot.is_some(),
    })))
}
