use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::state::AppState;
use dealsync_core::hubspot::DealDetails;
use dealsync_core::record::ProjectRecord;

/// GET /projects — every created project.
///
/// With a CRM token configured this is a live read-through: HubSpot's
/// current closed-won deals, projected into record shape but never written
/// back. Without one it serves the local store.
pub async fn list_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let projects = match &app.hubspot {
        Some(crm) => crm
            .list_closed_won()
            .await?
            .into_iter()
            .map(project_view)
            .collect(),
        None => {
            let store = app.store.clone();
            tokio::task::spawn_blocking(move || store.load())
                .await
                .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        }
    };

    Ok(Json(serde_json::json!({
        "total": projects.len(),
        "projects": projects,
    })))
}

/// Project a live CRM deal into the persisted record shape.
fn project_view(deal: DealDetails) -> ProjectRecord {
    let created_at = deal
        .close_date
        .as_deref()
        .and_then(|d| d.parse::<DateTime<Utc>>().ok())
        .unwrap_or_else(Utc::now);
    let mut record = ProjectRecord::new(
        deal.id.parse().unwrap_or_default(),
        deal.name,
        deal.id,
        deal.amount,
    );
    record.created_at = created_at;
    record
}
