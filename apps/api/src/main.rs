use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use aiworker_console::agents::{Console, ProcessingSimulator};
use aiworker_console::api::{build_router, AppState};
use aiworker_console::config::Config;
use aiworker_console::infrastructure::repositories::{
    InMemoryDetectionRepository, InMemoryInboxRepository, InMemoryOperatorRepository,
    InMemoryPreferenceRepository, InMemorySessionRepository,
};
use aiworker_console::infrastructure::seed::{seed_demo_data, seed_operator};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;

    let sessions = Arc::new(InMemorySessionRepository::new());
    let inbox = Arc::new(InMemoryInboxRepository::new());
    let detections = Arc::new(InMemoryDetectionRepository::new());
    let operators = Arc::new(InMemoryOperatorRepository::new());
    let preferences = Arc::new(InMemoryPreferenceRepository::new());

    if config.seed_demo_data {
        seed_demo_data(inbox.as_ref(), detections.as_ref()).await?;
    }
    seed_operator(
        operators.as_ref(),
        &config.operator_email,
        &config.operator_password,
        &config.operator_name,
        config.bcrypt_cost,
    )
    .await?;

    let console = Console::new(
        sessions,
        inbox,
        detections,
        ProcessingSimulator::new(config.step_interval),
    );
    let state = AppState::new(console, operators, preferences, config.jwt_secret.as_str());
    let app = build_router(state);

    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", config.bind_addr, e))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server failed: {}", e))
}
