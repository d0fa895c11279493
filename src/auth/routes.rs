//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /verify-token` - Verify an id token (no auth required)
/// - `GET /user/:uid` - Resolve a user by id (bearer auth)
pub fn auth_routes() -> Router {
    Router::new()
        .route("/verify-token", post(handlers::verify_token))
        .route("/user/:uid", get(handlers::get_user))
}
