use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aidagent_api::{
    config::Config,
    middleware::{auth, logging},
    routes::{alerts, chat, health},
    state::AppState,
};
use aidagent_core::{AlertRefreshOrchestrator, ChatSessionManager};
use aidagent_llm::GeminiClient;
use aidagent_persist::{AlertStore, ChatSessionStore, PersistClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting AidAgent API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize the generative client (alert provider + responder)
    tracing::info!("Initializing Gemini client");
    let gemini = Arc::new(
        GeminiClient::new(config.genai_api_key.clone())?
            .with_sourcing_model(config.genai.sourcing_model.clone())
            .with_chat_model(config.genai.chat_model.clone()),
    );

    // Initialize persistence client
    tracing::info!("Connecting to MongoDB");
    let persist = PersistClient::builder()
        .mongodb_uri(&config.mongodb_uri)
        .database(&config.mongodb.database)
        .build()
        .await?;
    tracing::info!("MongoDB connected");

    let alert_store: Arc<dyn AlertStore> = Arc::new(persist.alerts().clone());
    let chat_store: Arc<dyn ChatSessionStore> = Arc::new(persist.chats().clone());

    // Assemble the core state machines
    let orchestrator = AlertRefreshOrchestrator::new(
        alert_store.clone(),
        gemini.clone(),
        config.refresh.clone().into(),
    );
    let chat_manager = ChatSessionManager::new(
        alert_store.clone(),
        chat_store,
        gemini,
        config.chat.clone().into(),
    );

    // Create application state
    let state = Arc::new(AppState::new(
        config.clone(),
        alert_store,
        orchestrator,
        chat_manager,
    ));

    // Build router
    let app = build_router(state.clone());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    // Routes behind the bearer gate
    let api_routes = Router::new()
        // Alerts
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts", post(alerts::create_alert))
        .route("/alerts/:alert_id", get(alerts::get_alert))
        .route("/alerts/:alert_id", put(alerts::update_alert))
        .route("/alerts/:alert_id", delete(alerts::delete_alert))
        .route("/alerts/:alert_id/refresh", post(alerts::refresh_alert))
        // Chat
        .route("/alerts/:alert_id/chat", post(chat::converse))
        .route("/alerts/:alert_id/chat", get(chat::get_history))
        .layer(middleware::from_fn(auth::require_bearer));

    // Build full router with middleware
    Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(120)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            for origin in &config.cors.origins {
                if let Ok(parsed_origin) = origin.parse::<axum::http::HeaderValue>() {
                    cors = cors.allow_origin(parsed_origin);
                }
            }
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
