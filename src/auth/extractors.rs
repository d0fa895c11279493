//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::models::TokenVerifyRequest;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::firebase::FirebaseError;

/// Authenticated user extractor
///
/// Validates the bearer token against the identity provider and resolves the
/// calling user. Protected handlers take this as their first argument.
#[derive(Debug)]
pub struct AuthedUser {
    pub uid: String,
    pub email: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        // Extract Bearer token from Authorization header
        let token = match parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            Some(value) => value,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".to_string()));
            }
        };

        // Handle "Bearer <token>" format or raw token
        let bare_token = token.strip_prefix("Bearer ").unwrap_or(token).to_string();

        let verification = TokenVerifyRequest {
            id_token: bare_token,
        };
        match state.auth_service.verify_token(&verification).await {
            Ok(user) => {
                debug!(
                    uid = %user.uid,
                    email = %user.email.as_deref().map(safe_email_log).unwrap_or_default(),
                    "Request authenticated"
                );
                Ok(AuthedUser {
                    uid: user.uid,
                    email: user.email,
                })
            }
            Err(FirebaseError::InvalidToken) => {
                warn!("Authentication failed: invalid id token");
                Err(ApiError::Unauthorized("invalid or expired token".to_string()))
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed: provider error");
                Err(ApiError::InternalServer(
                    "token verification failed".to_string(),
                ))
            }
        }
    }
}
