use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/debug — recent reconcile activity from the bounded ring buffer.
pub async fn debug_log(State(app): State<AppState>) -> Json<serde_json::Value> {
    let entries = app.workflow.log().entries();
    Json(serde_json::json!({ "entries": entries }))
}
