use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::endpoints::{
    GeminiAvailableModel, GenerateContentRequest, GenerateContentResponse, Provider,
    GEMINI_MODELS,
};

/// Every way a call to the analysis service can fail.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no API key configured (expected in environment variable {0})")]
    MissingCredential(String),
    #[error("service rejected the API key ({status}): {error_body}")]
    InvalidCredential {
        status: StatusCode,
        error_body: String,
    },
    #[error("transport error: {0}")]
    TransportError(String),
    #[error("service returned no content")]
    EmptyResponse,
    #[error("could not decode service payload: {0}")]
    DecodeError(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::DecodeError(err.to_string())
        } else {
            ServiceError::TransportError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::DecodeError(err.to_string())
    }
}

/// Gemini reports a bad key as a 400 with `API_KEY_INVALID` in the body.
fn is_credential_rejection(status: StatusCode, error_body: &str) -> bool {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => true,
        StatusCode::BAD_REQUEST => error_body.contains("API_KEY_INVALID"),
        _ => false,
    }
}

impl Provider {
    pub fn gemini(api_key: Option<String>, base_url: &str) -> Self {
        Self::Gemini {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            available_models: GEMINI_MODELS.to_vec(),
        }
    }

    pub fn get_available_models(&self) -> Vec<GeminiAvailableModel> {
        match self {
            Provider::Gemini {
                available_models, ..
            } => available_models.clone(),
        }
    }

    /// Sends one `generateContent` request. Never retries.
    pub async fn call_generate_content(
        &self,
        client: &Client,
        credential_name: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ServiceError> {
        match self {
            Provider::Gemini {
                api_key, base_url, ..
            } => {
                let api_key = api_key
                    .as_deref()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| ServiceError::MissingCredential(credential_name.to_string()))?;

                let url = format!("{}/v1beta/models/{}:generateContent", base_url, request.model);
                tracing::debug!(%url, "sending generateContent request");

                let response = client
                    .post(&url)
                    .header("x-goog-api-key", api_key)
                    .json(&request)
                    .send()
                    .await?;

                let status = response.status();
                if status.is_success() {
                    let body = response.text().await?;
                    if body.trim().is_empty() {
                        return Err(ServiceError::EmptyResponse);
                    }
                    let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
                    if let Some(usage) = &parsed.usage_metadata {
                        tracing::debug!(
                            prompt_tokens = ?usage.prompt_token_count,
                            completion_tokens = ?usage.candidates_token_count,
                            "generateContent succeeded"
                        );
                    }
                    Ok(parsed)
                } else {
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    tracing::warn!(%status, "Gemini API returned an error status");
                    if is_credential_rejection(status, &error_body) {
                        Err(ServiceError::InvalidCredential { status, error_body })
                    } else {
                        Err(ServiceError::TransportError(format!(
                            "API error {}: {}",
                            status, error_body
                        )))
                    }
                }
            }
        }
    }
}
