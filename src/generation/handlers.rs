// src/generation/handlers.rs
//! Text generation handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::models::{GenerationRequest, GenerationResponse};
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::HuggingFaceService;

/// POST /mistral
/// Generates text with the Mistral model; requires bearer auth
///
/// # Request Body
/// ```json
/// {
///   "inputs": "Hello, how are you?",
///   "parameters": { "max_new_tokens": 256 }
/// }
/// ```
pub async fn generate_with_mistral(
    user: AuthedUser,
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResponse>, ApiError> {
    generate(&user, &state.mistral_service, request).await
}

/// POST /mixtral
/// Generates text with the Mixtral model; requires bearer auth
pub async fn generate_with_mixtral(
    user: AuthedUser,
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResponse>, ApiError> {
    generate(&user, &state.mixtral_service, request).await
}

async fn generate(
    user: &AuthedUser,
    service: &HuggingFaceService,
    request: GenerationRequest,
) -> Result<Json<GenerationResponse>, ApiError> {
    if request.inputs.trim().is_empty() {
        return Err(ApiError::BadRequest("inputs must not be empty".to_string()));
    }

    debug!(
        uid = %user.uid,
        email = %user.email.as_deref().map(safe_email_log).unwrap_or_default(),
        model = service.alias().as_str(),
        input_chars = request.inputs.len(),
        "Received text generation request"
    );

    match service.generate(&request).await {
        Ok(response) => {
            info!(
                uid = %user.uid,
                model = service.alias().as_str(),
                language = %response.detected_language,
                output_chars = response.generated_text.len(),
                "Text generation succeeded"
            );
            Ok(Json(response))
        }
        Err(e) => {
            // upstream and client failures alike collapse to 500 here
            error!(
                uid = %user.uid,
                model = service.alias().as_str(),
                error = %e,
                "Text generation failed"
            );
            Err(ApiError::InternalServer("text generation failed".to_string()))
        }
    }
}
