// src/main.rs
use anyhow::Context;
use axum::{extract::Extension, routing::get, Json, Router};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod common;
mod generation;
mod services;

use common::{AppConfig, AppState};
use services::{FirebaseService, HuggingFaceService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // CONFIGURATION (fail fast on missing or malformed credentials)
    // ========================================================================

    let config = AppConfig::from_env().context("invalid configuration")?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let auth_service = Arc::new(
        FirebaseService::new(config.firebase.clone())
            .context("failed to initialize identity provider service")?,
    );
    info!("FirebaseService initialized");

    let mistral_service = Arc::new(
        HuggingFaceService::new("mistral", config.huggingface.clone())
            .context("failed to initialize mistral inference client")?,
    );
    let mixtral_service = Arc::new(
        HuggingFaceService::new("mixtral", config.huggingface.clone())
            .context("failed to initialize mixtral inference client")?,
    );
    info!("HuggingFace inference clients initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let state = Arc::new(AppState {
        auth_service,
        mistral_service,
        mixtral_service,
    });

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .merge(auth::auth_routes())
        .merge(generation::generation_routes())
        .route("/health", get(health))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health - liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
