//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{MemoryStorage, PgStorage, RandomAnalysisAdapter},
    config::Config,
    error::ApiError,
    seed::seed_demo_data,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Select the Storage Backend & Build the Shared AppState ---
    let bind_address = config.bind_address;
    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", config.cors_origin, e))
    })?;
    let seed_demo = config.seed_demo;
    let analysis = Arc::new(RandomAnalysisAdapter::new());

    let app_state = match config.database_url.clone() {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;
            let pg = Arc::new(PgStorage::new(db_pool));
            info!("Running database migrations...");
            pg.run_migrations().await?;
            info!("Database migrations complete.");
            AppState {
                storage: pg.clone(),
                auth_sessions: pg,
                analysis,
                config: Arc::new(config),
            }
        }
        None => {
            warn!("DATABASE_URL not set. Using in-memory storage; data is lost on exit.");
            AppState::in_memory(config, analysis)
        }
    };
    let app_state = Arc::new(app_state);

    // --- 3. Seed the Demo Account ---
    if seed_demo {
        seed_demo_data(app_state.storage.as_ref()).await?;
    }

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // --- 5. Start the Server ---
    info!("Starting server on {}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
