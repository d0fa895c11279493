// Application state shared across all modules

use std::sync::Arc;

use crate::services::{FirebaseService, HuggingFaceService};

/// Application state containing the service handles used by request handlers.
///
/// All services are constructed once at startup and injected through an
/// `Extension<Arc<AppState>>`; nothing in here mutates after startup apart
/// from the access token cache owned by [`FirebaseService`].
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<FirebaseService>,
    pub mistral_service: Arc<HuggingFaceService>,
    pub mixtral_service: Arc<HuggingFaceService>,
}
