//! Text generation request/response schemas

use serde::{Deserialize, Serialize};

/// Body of a generation request.
///
/// When `parameters` is present it replaces the default set in full; there is
/// no partial merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub inputs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Normalized generation result returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub generated_text: String,
    pub detected_language: String,
}

/// Default generation-control knobs applied when the caller supplies none.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub do_sample: bool,
    pub return_full_text: bool,
    pub repetition_penalty: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 1024,
            temperature: 0.1,
            top_p: 0.1,
            do_sample: true,
            return_full_text: false,
            repetition_penalty: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_parameters_serialize_to_the_documented_knobs() {
        let value = serde_json::to_value(GenerationParameters::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "max_new_tokens": 1024,
                "temperature": 0.1,
                "top_p": 0.1,
                "do_sample": true,
                "return_full_text": false,
                "repetition_penalty": 1.2
            })
        );
    }

    #[test]
    fn test_generation_request_parameters_default_to_none() {
        let request: GenerationRequest =
            serde_json::from_value(json!({ "inputs": "hello" })).unwrap();
        assert!(request.parameters.is_none());
    }
}
