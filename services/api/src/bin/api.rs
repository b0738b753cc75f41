//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{analysis_llm::OpenAiAnalysisAdapter, history_file::JsonFileHistoryStorage},
    config::Config,
    error::ApiError,
    web::{rest::openapi_document, router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.require_api_key()?)
        .with_api_base(config.analysis_api_base.clone());
    let openai_client = Client::with_config(openai_config);
    let analysis_adapter = Arc::new(OpenAiAnalysisAdapter::new(
        openai_client,
        config.analysis_model.clone(),
    ));
    info!(
        "Using analysis model '{}' at {}",
        config.analysis_model, config.analysis_api_base
    );

    let history_storage = Arc::new(JsonFileHistoryStorage::new(config.history_path()));
    info!("History file: {}", history_storage.path().display());

    // --- 3. Build the Shared AppState (loads the persisted history) ---
    let app_state = Arc::new(AppState::new(config.clone(), analysis_adapter, history_storage).await);

    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:3000"))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi_document()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
