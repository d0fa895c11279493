//! Text generation routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the text generation router
///
/// # Routes
/// - `POST /mistral` - Generate text with the Mistral model (bearer auth)
/// - `POST /mixtral` - Generate text with the Mixtral model (bearer auth)
pub fn generation_routes() -> Router {
    Router::new()
        .route("/mistral", post(handlers::generate_with_mistral))
        .route("/mixtral", post(handlers::generate_with_mixtral))
}
