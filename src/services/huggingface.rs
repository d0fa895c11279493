// src/services/huggingface.rs
//! Client for the Hugging Face hosted inference API

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::generation::language::{detect_language, format_prompt};
use crate::generation::models::{GenerationParameters, GenerationRequest, GenerationResponse};

#[derive(Debug, thiserror::Error)]
pub enum HuggingFaceError {
    #[error("model {0:?} is not supported, available models: mistral, mixtral")]
    UnknownModel(String),

    #[error("HUGGINGFACE_TOKEN is not configured")]
    MissingToken,

    #[error("inference endpoint returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("inference endpoint returned HTTP {status} without a generation payload")]
    UnexpectedPayload { status: StatusCode },

    #[error("inference call failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    #[error("maximum retries reached")]
    MaxRetries,

    #[error("failed to serialize request payload: {0}")]
    Serialization(String),
}

/// Short alias selecting which remote model the client targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelAlias {
    Mistral,
    Mixtral,
}

impl ModelAlias {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "mistral" => Some(ModelAlias::Mistral),
            "mixtral" => Some(ModelAlias::Mixtral),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelAlias::Mistral => "mistral",
            ModelAlias::Mixtral => "mixtral",
        }
    }

    /// Remote model identifier on the inference provider
    pub fn model_id(self) -> &'static str {
        match self {
            ModelAlias::Mistral => "mistralai/Mistral-7B-Instruct-v0.2",
            ModelAlias::Mixtral => "mistralai/Mixtral-8x7B-Instruct-v0.1",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_token: String,
    pub api_url: String,
    pub request_timeout: Duration,
    pub retry_delay: Duration,
    pub max_attempts: u32,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            api_url: "https://api-inference.huggingface.co".to_string(),
            request_timeout: Duration::from_secs(60),
            retry_delay: Duration::from_secs(2),
            max_attempts: 3,
        }
    }
}

/// Outcome of a single inference attempt.
///
/// Client errors other than 503 short-circuit the retry loop, and a 200
/// carrying a decodable but non-list payload does the same without touching
/// the retry budget. Only cold starts and transport failures burn attempts.
enum AttemptOutcome {
    Success(String),
    Retryable(RetryReason),
    Fatal(HuggingFaceError),
}

enum RetryReason {
    /// HTTP 503, the model is still loading
    ColdStart,
    /// Timeout, connection failure, or an undecodable body
    Transport(String),
}

impl RetryReason {
    fn describe(&self) -> String {
        match self {
            RetryReason::ColdStart => "model loading (HTTP 503)".to_string(),
            RetryReason::Transport(message) => message.clone(),
        }
    }
}

#[derive(Debug)]
pub struct HuggingFaceService {
    alias: ModelAlias,
    endpoint: String,
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceService {
    /// Create a client for the given model alias.
    ///
    /// Fails before any network activity when the alias is unknown or the
    /// bearer token is absent.
    pub fn new(model_name: &str, config: HuggingFaceConfig) -> Result<Self, HuggingFaceError> {
        let alias = ModelAlias::parse(model_name)
            .ok_or_else(|| HuggingFaceError::UnknownModel(model_name.to_string()))?;

        if config.api_token.trim().is_empty() {
            return Err(HuggingFaceError::MissingToken);
        }

        let endpoint = format!(
            "{}/models/{}",
            config.api_url.trim_end_matches('/'),
            alias.model_id()
        );

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            alias,
            endpoint,
            client,
            config,
        })
    }

    pub fn alias(&self) -> ModelAlias {
        self.alias
    }

    /// Generate text for the request, retrying cold starts and transport
    /// failures up to the configured attempt budget.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, HuggingFaceError> {
        let language = detect_language(&request.inputs);
        let prompt = format_prompt(&request.inputs, language);

        // Caller parameters replace the defaults wholesale, never merged
        let parameters = match &request.parameters {
            Some(params) => Value::Object(params.clone()),
            None => serde_json::to_value(GenerationParameters::default())
                .map_err(|e| HuggingFaceError::Serialization(e.to_string()))?,
        };

        let payload = serde_json::json!({
            "inputs": prompt,
            "parameters": parameters,
        });

        debug!(
            model = self.alias.as_str(),
            language = language.code(),
            "Sending text generation request"
        );

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&payload).await {
                AttemptOutcome::Success(generated_text) => {
                    info!(
                        model = self.alias.as_str(),
                        language = language.code(),
                        attempt = attempt,
                        "Text generation completed"
                    );
                    return Ok(GenerationResponse {
                        generated_text,
                        detected_language: language.code().to_string(),
                    });
                }
                AttemptOutcome::Fatal(err) => {
                    error!(
                        model = self.alias.as_str(),
                        attempt = attempt,
                        error = %err,
                        "Text generation failed, not retrying"
                    );
                    return Err(err);
                }
                AttemptOutcome::Retryable(reason) => {
                    warn!(
                        model = self.alias.as_str(),
                        attempt = attempt,
                        max_attempts = self.config.max_attempts,
                        reason = %reason.describe(),
                        "Inference attempt failed"
                    );

                    if attempt < self.config.max_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                        continue;
                    }

                    return Err(match reason {
                        RetryReason::ColdStart => HuggingFaceError::MaxRetries,
                        RetryReason::Transport(message) => HuggingFaceError::RetriesExhausted {
                            attempts: self.config.max_attempts,
                            message,
                        },
                    });
                }
            }
        }

        Err(HuggingFaceError::MaxRetries)
    }

    /// Issue one POST to the inference endpoint and classify the outcome.
    async fn attempt(&self, payload: &Value) -> AttemptOutcome {
        let response = match self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Retryable(RetryReason::Transport(e.to_string())),
        };

        let status = response.status();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return AttemptOutcome::Retryable(RetryReason::ColdStart);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return AttemptOutcome::Fatal(HuggingFaceError::Status { status, body });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return AttemptOutcome::Retryable(RetryReason::Transport(e.to_string())),
        };

        // An undecodable body counts as a transport failure; a decodable one
        // that is not a non-empty list short-circuits like any other bad status
        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                return AttemptOutcome::Retryable(RetryReason::Transport(format!(
                    "failed to decode response body: {e}"
                )))
            }
        };

        match value.as_array().and_then(|entries| entries.first()) {
            Some(first) => {
                let generated_text = first
                    .get("generated_text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                AttemptOutcome::Success(generated_text)
            }
            None => AttemptOutcome::Fatal(HuggingFaceError::UnexpectedPayload { status }),
        }
    }
}
