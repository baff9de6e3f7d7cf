pub mod error;
pub mod routes;
pub mod state;
pub mod worker;

use axum::routing::{get, post};
use axum::Router;
use dealsync_core::config::Config;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/", get(routes::status::status))
        .route("/api/status", get(routes::status::status))
        // Webhook ingestion
        .route("/webhook/hubspot/deal-won", post(routes::webhook::deal_won))
        // Created projects
        .route("/projects", get(routes::projects::list_projects))
        // Manual test trigger
        .route("/test/trigger", post(routes::trigger::trigger))
        // Recent activity
        .route("/api/debug", get(routes::debug::debug_log))
        // Basecamp OAuth helper
        .route("/auth/basecamp", get(routes::auth::authorize))
        .route("/auth/basecamp/callback", get(routes::auth::callback))
        .layer(cors)
        .with_state(app_state)
}

/// Start the relay server.
pub async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    let app = build_router(state::AppState::new(config));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("dealsync listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
