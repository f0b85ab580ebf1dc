// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::{agents, auth, detections, preferences, sessions};
pub use state::AppState;

/// Builds the console HTTP router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/login", post(auth::login))
        // Agent directory and inboxes
        .route("/api/agents", get(agents::list_agents))
        .route("/api/agents/:agent_id/sessions", get(agents::agent_sessions))
        .route("/api/agents/:agent_id/inbox", get(agents::agent_inbox))
        .route(
            "/api/agents/:agent_id/inbox/:routed_id/session",
            post(agents::open_inbox_session),
        )
        // Session entry points
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/its/requests", post(sessions::submit_its_request))
        .route("/api/monitoring/runs", post(sessions::start_monitoring_run))
        // Session operations
        .route(
            "/api/sessions/:id",
            get(sessions::get_session).delete(sessions::close_session),
        )
        .route("/api/sessions/:id/actions", post(sessions::dispatch_action))
        .route("/api/sessions/:id/messages", post(sessions::post_message))
        .route(
            "/api/sessions/:id/tasks",
            post(sessions::run_task).delete(sessions::cancel_task),
        )
        .route("/api/sessions/:id/report", post(sessions::start_report))
        // Detections and layout
        .route("/api/detections", get(detections::list_detections))
        .route(
            "/api/preferences",
            get(preferences::get_preferences).put(preferences::put_preferences),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
