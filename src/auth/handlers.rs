//! Authentication handlers

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{TokenVerifyRequest, UserResponse};
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::firebase::FirebaseError;

/// POST /verify-token
/// Verifies an identity provider id token and returns the user it belongs to
///
/// # Request Body
/// ```json
/// {
///   "id_token": "<provider id token>"
/// }
/// ```
///
/// # Response
/// ```json
/// {
///   "uid": "...",
///   "email": "...",
///   "display_name": "..."
/// }
/// ```
pub async fn verify_token(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TokenVerifyRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    info!("Received token verification request");

    match state.auth_service.verify_token(&payload).await {
        Ok(user) => {
            info!(
                uid = %user.uid,
                email = %user.email.as_deref().map(safe_email_log).unwrap_or_default(),
                "Token verified successfully"
            );
            Ok(Json(user.into()))
        }
        Err(FirebaseError::InvalidToken) => {
            warn!("Token verification failed: invalid token");
            Err(ApiError::BadRequest("invalid or expired id_token".to_string()))
        }
        Err(e) => {
            error!(error = %e, "Unexpected error during token verification");
            Err(ApiError::InternalServer(
                "internal server error during token verification".to_string(),
            ))
        }
    }
}

/// GET /user/:uid
/// Resolves a user by their stable identifier; requires bearer auth
pub async fn get_user(
    caller: AuthedUser,
    Extension(state): Extension<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    info!(caller = %caller.uid, uid = %uid, "Received user lookup request");

    match state.auth_service.get_user(&uid).await {
        Ok(user) => Ok(Json(user.into())),
        Err(FirebaseError::UserNotFound(_)) => {
            warn!(uid = %uid, "User not found");
            Err(ApiError::NotFound(format!("user not found: {uid}")))
        }
        Err(e) => {
            error!(error = %e, uid = %uid, "User lookup failed");
            Err(ApiError::InternalServer("user lookup failed".to_string()))
        }
    }
}
