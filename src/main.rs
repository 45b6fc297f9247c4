// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use omr_backend::config::Config;
use omr_backend::routes;
use omr_backend::services::seed::seed_catalog_file;
use omr_backend::state::AppState;
use omr_backend::utils::sampler::ThreadRngSampler;
use omr_backend::db;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "omr.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database after 5 retries");

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    db::migrate(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Seed the subject/question catalog
    if let Some(path) = &config.seed_file {
        if let Err(e) = seed_catalog_file(&pool, path).await {
            tracing::error!("Failed to seed catalog from {}: {:?}", path, e);
        }
    }

    let bind_addr = config.bind_addr.clone();

    // Create AppState
    let state = AppState {
        pool: pool.clone(),
        config,
        sampler: Arc::new(ThreadRngSampler),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", bind_addr, e));
    tracing::info!("Listening on {}", bind_addr);

    // Start the server
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
