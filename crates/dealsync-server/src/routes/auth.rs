use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// GET /auth/basecamp — redirect the operator's browser to the Basecamp
/// consent page. Requires the OAuth app registration in the environment.
pub async fn authorize(State(app): State<AppState>) -> Result<Redirect, AppError> {
    let Some(oauth) = app.config.oauth_app() else {
        return Err(AppError::bad_request(
            "BASECAMP_CLIENT_ID, BASECAMP_CLIENT_SECRET, and BASECAMP_REDIRECT_URI must be set",
        ));
    };

    let state_param: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    if let Ok(mut slot) = app.oauth_state.lock() {
        *slot = Some(state_param.clone());
    }

    Ok(Redirect::temporary(&oauth.authorize_url(&state_param)))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// GET /auth/basecamp/callback — exchange the authorization code for a
/// bearer token and hand it to the operator. The token is not wired into the
/// running process; set `BASECAMP_ACCESS_TOKEN` and restart.
pub async fn callback(
    State(app): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(oauth) = app.config.oauth_app() else {
        return Err(AppError::bad_request(
            "BASECAMP_CLIENT_ID, BASECAMP_CLIENT_SECRET, and BASECAMP_REDIRECT_URI must be set",
        ));
    };

    let issued = app
        .oauth_state
        .lock()
        .ok()
        .and_then(|mut slot| slot.take());
    if issued.is_none() || issued != params.state {
        return Err(AppError::bad_request("oauth state mismatch"));
    }

    let token = oauth.exchange_code(&params.code).await?;
    tracing::info!("basecamp oauth exchange completed");

    Ok(Json(serde_json::json!({
        "message": "Set BASECAMP_ACCESS_TOKEN to this token and restart",
        "token": token,
    })))
}
